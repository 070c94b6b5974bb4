/// Variable names declared in a dotenv file, in first-seen order.
///
/// Values are never returned. Lines may carry an `export ` prefix; blank
/// lines, comments and lines that do not start with a valid identifier are
/// skipped.
pub fn parse_env_names(content: &str) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();

    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let line = line.strip_prefix("export ").map_or(line, str::trim_start);
        let Some((name, _value)) = line.split_once('=') else {
            continue;
        };
        let name = name.trim();
        if is_identifier(name) && !names.iter().any(|seen| seen == name) {
            names.push(name.to_string());
        }
    }

    names
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .map_or(false, |c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
