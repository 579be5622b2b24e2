use std::fmt;

// アクターの引数 "Greedy(riichi=false)" などの値
#[derive(Debug, Clone, PartialEq)]
pub enum Variant {
    Int(i64),
    Bool(bool),
    String(String),
}

impl Variant {
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(v) => Some(v),
            _ => None,
        }
    }

    // 既定値と同じ型として文字列を解釈
    pub fn parse_like(&self, value: &str) -> Result<Variant, String> {
        Ok(match self {
            Self::Int(_) => Self::Int(value.parse::<i64>().map_err(|e| e.to_string())?),
            Self::Bool(_) => Self::Bool(value.parse::<bool>().map_err(|e| e.to_string())?),
            Self::String(_) => Self::String(value.to_string()),
        })
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(v) => write!(f, "{}", v),
            Self::Bool(v) => write!(f, "{}", v),
            Self::String(v) => write!(f, "{}", v),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Arg {
    pub name: String,
    pub value: Variant,
}

impl Arg {
    pub fn int(name: &str, value: i64) -> Self {
        Self {
            name: name.to_string(),
            value: Variant::Int(value),
        }
    }

    pub fn bool(name: &str, value: bool) -> Self {
        Self {
            name: name.to_string(),
            value: Variant::Bool(value),
        }
    }

    pub fn string(name: &str, value: &str) -> Self {
        Self {
            name: name.to_string(),
            value: Variant::String(value.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_with_default_type() {
        assert_eq!(Variant::Int(0).parse_like("42"), Ok(Variant::Int(42)));
        assert_eq!(Variant::Bool(true).parse_like("false"), Ok(Variant::Bool(false)));
        assert!(Variant::Int(0).parse_like("x").is_err());
        assert_eq!(Variant::String(String::new()).parse_like("m123").unwrap().as_str(), Some("m123"));
    }
}
