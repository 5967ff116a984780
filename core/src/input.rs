use anyhow::{anyhow, Result};

/// Command-line tokens split into free words and `key:value` pairs.
#[derive(Debug, PartialEq, Default)]
pub struct ParsedInput {
    pub words: Vec<String>,
    pub pairs: Vec<(String, String)>,
}

impl ParsedInput {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .rev()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

pub fn parse_args(args: &[String]) -> ParsedInput {
    let mut parsed = ParsedInput::default();

    for arg in args {
        if let Some((key, value)) = arg.split_once(':') {
            if !key.is_empty() {
                parsed.pairs.push((key.to_lowercase(), value.to_string()));
                continue;
            }
        }
        parsed.words.push(arg.clone());
    }

    parsed
}

/// Resolves `key` to one of `candidates`, accepting any unique prefix.
pub fn expand_key<'a>(key: &str, candidates: &[&'a str]) -> Result<&'a str> {
    if let Some(&exact) = candidates.iter().find(|&&c| c == key) {
        return Ok(exact);
    }

    let matches: Vec<&'a str> = candidates
        .iter()
        .filter(|&&c| c.starts_with(key))
        .copied()
        .collect();

    match matches.len() {
        1 => Ok(matches[0]),
        0 => Err(anyhow!("Unknown key: '{}'", key)),
        _ => Err(anyhow!("Ambiguous key: '{}' matches {:?}", key, matches)),
    }
}

pub fn parse_quantity(raw: &str) -> Result<f64> {
    let value: f64 = raw
        .trim()
        .parse()
        .map_err(|_| anyhow!("Invalid quantity: '{}'", raw))?;
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple() {
        let args = vec![
            "commute".to_string(),
            "pub:10".to_string(),
            "Elec:12.5".to_string(),
            "date:yesterday".to_string(),
        ];
        let parsed = parse_args(&args);
        assert_eq!(parsed.words, vec!["commute".to_string()]);
        assert_eq!(parsed.get("pub"), Some("10"));
        assert_eq!(parsed.get("elec"), Some("12.5"));
        assert_eq!(parsed.get("date"), Some("yesterday"));
        assert_eq!(parsed.get("meat"), None);
    }

    #[test]
    fn test_later_pair_wins() {
        let args = vec!["meat:1".to_string(), "meat:2".to_string()];
        assert_eq!(parse_args(&args).get("meat"), Some("2"));
    }

    #[test]
    fn test_expand_key() {
        let candidates = vec!["public_transport", "private_vehicle", "plastic", "gas"];

        assert_eq!(expand_key("pu", &candidates).unwrap(), "public_transport");
        assert_eq!(expand_key("pri", &candidates).unwrap(), "private_vehicle");
        assert_eq!(expand_key("gas", &candidates).unwrap(), "gas");
        assert_eq!(expand_key("pl", &candidates).unwrap(), "plastic");

        // Ambiguous
        assert!(expand_key("p", &candidates).is_err());

        // Unknown
        assert!(expand_key("x", &candidates).is_err());
    }

    #[test]
    fn test_parse_quantity() {
        assert_eq!(parse_quantity(" 2.5 ").unwrap(), 2.5);
        assert!(parse_quantity("lots").is_err());
    }
}
