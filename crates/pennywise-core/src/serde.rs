use serde::{Deserialize, Deserializer};

/// Canonical form of an email address: surrounding whitespace removed, lower-cased.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

pub fn deserialize_normalized_email<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    Ok(normalize_email(&raw))
}

pub fn deserialize_optional_normalized_email<'de, D>(
    deserializer: D,
) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt: Option<String> = Option::deserialize(deserializer)?;
    Ok(opt.map(|raw| normalize_email(&raw)))
}

pub fn deserialize_trimmed<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    Ok(raw.trim().to_string())
}

pub fn deserialize_optional_trimmed<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt: Option<String> = Option::deserialize(deserializer)?;
    Ok(opt.map(|raw| raw.trim().to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ::serde::Deserialize;

    #[derive(Deserialize)]
    struct Input {
        #[serde(deserialize_with = "deserialize_normalized_email")]
        email: String,
        #[serde(default, deserialize_with = "deserialize_optional_trimmed")]
        name: Option<String>,
    }

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email("  Ana@X.com "), "ana@x.com");
    }

    #[test]
    fn test_deserialize_normalizes() {
        let input: Input =
            serde_json::from_str(r#"{"email":" Ana@X.COM","name":"  Ana "}"#).unwrap();
        assert_eq!(input.email, "ana@x.com");
        assert_eq!(input.name.as_deref(), Some("Ana"));
    }

    #[test]
    fn test_optional_field_may_be_missing() {
        let input: Input = serde_json::from_str(r#"{"email":"a@b.c"}"#).unwrap();
        assert!(input.name.is_none());
    }
}
