//! Line-oriented reader for the `.sln` text format

use crate::SolutionError;

const HEADER: &str = "Microsoft Visual Studio Solution File";

/// A `Project(...)` block as written in the file
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ProjectEntry {
    pub type_guid: String,
    pub name: String,
    pub path: String,
    pub guid: String,
    /// Keys of the `SolutionItems` section
    pub items: Vec<String>,
}

/// Everything the builder needs from a solution file
#[derive(Debug, Default)]
pub(crate) struct RawSolution {
    pub entries: Vec<ProjectEntry>,
    /// `(child, parent)` pairs from `GlobalSection(NestedProjects)`
    pub nested: Vec<(String, String)>,
}

pub(crate) fn read_solution(source: &str) -> Result<RawSolution, SolutionError> {
    let mut lines = source
        .lines()
        .enumerate()
        .map(|(index, line)| (index + 1, line.trim_start_matches('\u{feff}').trim()));

    let header = lines.by_ref().find(|(_, line)| !line.is_empty());
    if !header.is_some_and(|(_, line)| line.starts_with(HEADER)) {
        return Err(SolutionError::MissingHeader);
    }

    let mut solution = RawSolution::default();

    while let Some((number, line)) = lines.next() {
        if line.starts_with("Project(") {
            solution.entries.push(read_project(number, line, &mut lines)?);
        } else if line == "Global" {
            read_global(number, &mut lines, &mut solution.nested)?;
        }
    }

    Ok(solution)
}

fn read_project<'a>(
    number: usize,
    line: &str,
    lines: &mut impl Iterator<Item = (usize, &'a str)>,
) -> Result<ProjectEntry, SolutionError> {
    let mut entry = parse_project_declaration(line).ok_or_else(|| SolutionError::Parse {
        line: number,
        message: format!("malformed project declaration `{line}`"),
    })?;

    while let Some((inner_number, inner)) = lines.next() {
        if inner == "EndProject" {
            return Ok(entry);
        }

        if let Some(kind) = section_kind(inner, "ProjectSection(") {
            let body = read_block(inner_number, "EndProjectSection", lines)?;
            if kind == "SolutionItems" {
                for (item_number, item) in body {
                    let (key, _) = parse_pair(item_number, item)?;
                    entry.items.push(key.to_string());
                }
            }
        }
    }

    Err(SolutionError::Parse {
        line: number,
        message: format!("project `{}` is never closed with `EndProject`", entry.name),
    })
}

fn read_global<'a>(
    number: usize,
    lines: &mut impl Iterator<Item = (usize, &'a str)>,
    nested: &mut Vec<(String, String)>,
) -> Result<(), SolutionError> {
    while let Some((inner_number, inner)) = lines.next() {
        if inner == "EndGlobal" {
            return Ok(());
        }

        if let Some(kind) = section_kind(inner, "GlobalSection(") {
            let body = read_block(inner_number, "EndGlobalSection", lines)?;
            if kind == "NestedProjects" {
                for (pair_number, pair) in body {
                    let (child, parent) = parse_pair(pair_number, pair)?;
                    nested.push((child.to_string(), parent.to_string()));
                }
            }
        }
    }

    Err(SolutionError::Parse {
        line: number,
        message: "`Global` is never closed with `EndGlobal`".to_string(),
    })
}

/// Collects the non-empty lines up to `end`
fn read_block<'a>(
    number: usize,
    end: &str,
    lines: &mut impl Iterator<Item = (usize, &'a str)>,
) -> Result<Vec<(usize, &'a str)>, SolutionError> {
    let mut body = Vec::new();
    for (inner_number, inner) in lines.by_ref() {
        if inner == end {
            return Ok(body);
        }
        if !inner.is_empty() {
            body.push((inner_number, inner));
        }
    }

    Err(SolutionError::Parse {
        line: number,
        message: format!("section is never closed with `{end}`"),
    })
}

/// `ProjectSection(SolutionItems) = preProject` -> `SolutionItems`
fn section_kind<'a>(line: &'a str, prefix: &str) -> Option<&'a str> {
    let rest = line.strip_prefix(prefix)?;
    rest.split_once(')').map(|(kind, _)| kind.trim())
}

/// `key = value`
fn parse_pair(number: usize, line: &str) -> Result<(&str, &str), SolutionError> {
    line.split_once('=')
        .map(|(key, value)| (key.trim(), value.trim()))
        .filter(|(key, _)| !key.is_empty())
        .ok_or_else(|| SolutionError::Parse {
            line: number,
            message: format!("expected `key = value`, found `{line}`"),
        })
}

/// `Project("{TYPE}") = "Name", "Path", "{GUID}"`
fn parse_project_declaration(line: &str) -> Option<ProjectEntry> {
    let rest = line.strip_prefix("Project(")?;
    let (type_guid, rest) = rest.split_once(')')?;
    let rest = rest.trim_start().strip_prefix('=')?;

    let fields: Vec<&str> = rest.split(',').map(str::trim).collect();
    let [name, path, guid] = fields.as_slice() else {
        return None;
    };

    Some(ProjectEntry {
        type_guid: unquote(type_guid.trim())?.to_string(),
        name: unquote(name)?.to_string(),
        path: unquote(path)?.to_string(),
        guid: unquote(guid)?.to_string(),
        items: Vec::new(),
    })
}

fn unquote(value: &str) -> Option<&str> {
    value.strip_prefix('"')?.strip_suffix('"')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reads_declaration() {
        let entry = parse_project_declaration(
            r#"Project("{9A19103F-16F7-4668-BE54-9A1E7A4F7556}") = "Script_2", "Script_2\Script_2.csproj", "{AAAA0000-0000-0000-0000-000000000001}""#,
        )
        .unwrap();

        assert_eq!(entry.type_guid, "{9A19103F-16F7-4668-BE54-9A1E7A4F7556}");
        assert_eq!(entry.name, "Script_2");
        assert_eq!(entry.path, r"Script_2\Script_2.csproj");
        assert_eq!(entry.guid, "{AAAA0000-0000-0000-0000-000000000001}");
    }

    #[test]
    fn test_rejects_malformed_declaration() {
        assert!(parse_project_declaration(r#"Project("{X}") = "OnlyName""#).is_none());
        assert!(parse_project_declaration(r#"Project("{X}") "A", "B", "C""#).is_none());
        assert!(parse_project_declaration(r#"Project({X}) = "A", "B", "C""#).is_none());
    }

    #[test]
    fn test_requires_header() {
        assert_eq!(
            read_solution("Global\nEndGlobal\n").unwrap_err(),
            SolutionError::MissingHeader
        );
        assert_eq!(read_solution("").unwrap_err(), SolutionError::MissingHeader);
    }

    #[test]
    fn test_accepts_bom_and_blank_lines() {
        let source = "\u{feff}\r\nMicrosoft Visual Studio Solution File, Format Version 12.00\r\n";
        let solution = read_solution(source).unwrap();
        assert!(solution.entries.is_empty());
    }

    #[test]
    fn test_reports_unterminated_project() {
        let source = "Microsoft Visual Studio Solution File, Format Version 12.00\n\
            Project(\"{2150E333-8FDC-42A3-9474-1A3956D46DE8}\") = \"Macros\", \"Macros\", \"{1}\"\n";
        assert_eq!(
            read_solution(source).unwrap_err(),
            SolutionError::Parse {
                line: 2,
                message: "project `Macros` is never closed with `EndProject`".to_string(),
            }
        );
    }

    #[test]
    fn test_reports_malformed_solution_item() {
        let source = "Microsoft Visual Studio Solution File, Format Version 12.00\n\
            Project(\"{2150E333-8FDC-42A3-9474-1A3956D46DE8}\") = \"Macros\", \"Macros\", \"{1}\"\n\
            \tProjectSection(SolutionItems) = preProject\n\
            \t\tno separator here\n\
            \tEndProjectSection\n\
            EndProject\n";
        assert!(matches!(
            read_solution(source).unwrap_err(),
            SolutionError::Parse { line: 4, .. }
        ));
    }

    #[test]
    fn test_reads_items_and_nesting() {
        let source = "Microsoft Visual Studio Solution File, Format Version 12.00\n\
            Project(\"{2150E333-8FDC-42A3-9474-1A3956D46DE8}\") = \"Macro_1\", \"Macro_1\", \"{2}\"\n\
            \tProjectSection(SolutionItems) = preProject\n\
            \t\tMacros\\Macro_1\\Macro_1.xml = Macros\\Macro_1\\Macro_1.xml\n\
            \tEndProjectSection\n\
            EndProject\n\
            Global\n\
            \tGlobalSection(SolutionConfigurationPlatforms) = preSolution\n\
            \t\tDebug|Any CPU = Debug|Any CPU\n\
            \tEndGlobalSection\n\
            \tGlobalSection(NestedProjects) = preSolution\n\
            \t\t{2} = {1}\n\
            \tEndGlobalSection\n\
            EndGlobal\n";

        let solution = read_solution(source).unwrap();
        assert_eq!(solution.entries.len(), 1);
        assert_eq!(solution.entries[0].items, vec![r"Macros\Macro_1\Macro_1.xml"]);
        assert_eq!(
            solution.nested,
            vec![("{2}".to_string(), "{1}".to_string())]
        );
    }
}
