use serde::Serialize;

/// Ground-truth and predicted class. Malignant is the positive class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Label {
    Benign,
    Malignant,
}

impl Label {
    pub const ALL: [Label; 2] = [Label::Benign, Label::Malignant];

    pub fn from_class(class: i64) -> Option<Label> {
        match class {
            0 => Some(Label::Benign),
            1 => Some(Label::Malignant),
            _ => None,
        }
    }

    pub fn class(self) -> u8 {
        match self {
            Label::Benign => 0,
            Label::Malignant => 1,
        }
    }

    pub fn is_positive(self) -> bool {
        self == Label::Malignant
    }

    pub fn name(self) -> &'static str {
        match self {
            Label::Benign => "Benign",
            Label::Malignant => "Malignant",
        }
    }

    /// Accepts `0`/`1` or the class name in any case.
    pub fn parse(value: &str) -> Option<Label> {
        let value = value.trim();
        if let Ok(class) = value.parse::<i64>() {
            return Label::from_class(class);
        }
        match value.to_ascii_lowercase().as_str() {
            "benign" => Some(Label::Benign),
            "malignant" => Some(Label::Malignant),
            _ => None,
        }
    }
}

impl std::fmt::Display for Label {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
