use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Tri-state requirement used for flagship and MVP conditions: the goal
/// counts a sortie when the condition is met ("yes"), not met ("no"), or
/// either way ("maybe").
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Requirement {
    Yes,
    No,
    Maybe,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum Rank {
    S,
    A,
    B,
    C,
    D,
    E,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum BaseExp {
    Standard { map: String },
    Custom { value: u64 },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Method {
    Sortie {
        flagship: Requirement,
        rank: Vec<Rank>,
        mvp: Requirement,
        #[serde(rename = "baseExp")]
        base_exp: BaseExp,
    },
    Custom {
        exp: u64,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Template {
    Main {
        method: Method,
    },
    Custom {
        enabled: bool,
        ships: Vec<u64>,
        method: Method,
    },
}

impl Template {
    /// Catch-all template substituted when a legacy configuration carries no
    /// usable template list: sortie goals on map 5-4, any rank S/A/B,
    /// flagship and MVP optional.
    pub fn default_main() -> Self {
        Template::Main {
            method: Method::Sortie {
                flagship: Requirement::Maybe,
                rank: vec![Rank::S, Rank::A, Rank::B],
                mvp: Requirement::Maybe,
                base_exp: BaseExp::Standard {
                    map: "5-4".to_string(),
                },
            },
        }
    }

    pub fn from_value(value: &Value) -> Option<Self> {
        serde_json::from_value(value.clone()).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_default_main_template_shape() {
        let value = serde_json::to_value(Template::default_main()).unwrap();
        assert_eq!(
            value,
            json!({
                "type": "main",
                "method": {
                    "type": "sortie",
                    "flagship": "maybe",
                    "rank": ["S", "A", "B"],
                    "mvp": "maybe",
                    "baseExp": {"type": "standard", "map": "5-4"},
                },
            })
        );
    }

    #[test]
    fn test_custom_template_round_trip() {
        let raw = json!({
            "type": "custom",
            "enabled": true,
            "ships": [185, 318],
            "method": {"type": "custom", "exp": 3000},
        });
        let template = Template::from_value(&raw).unwrap();
        assert_eq!(
            template,
            Template::Custom {
                enabled: true,
                ships: vec![185, 318],
                method: Method::Custom { exp: 3000 },
            }
        );
        assert_eq!(serde_json::to_value(&template).unwrap(), raw);
    }

    #[test]
    fn test_unrecognized_template_is_rejected() {
        assert!(Template::from_value(&json!({"type": "weekly"})).is_none());
        assert!(Template::from_value(&json!("main")).is_none());
    }
}
