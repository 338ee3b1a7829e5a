use serde::{Deserialize, Serialize};

/// Severity level of an event condition, ordered by [`Level::rank`].
///
/// The wire form is the upper-case name. Strings that match no known level
/// decode as [`Level::Unknown`] instead of failing, so a newer server can
/// introduce levels without breaking older editors.
///
/// # Examples
///
/// ```
/// use evset_common::types::Level;
///
/// let level: Level = "danger".parse().unwrap();
/// assert_eq!(level, Level::Danger);
/// assert_eq!(level.to_string(), "DANGER");
/// assert_eq!(Level::from("BOGUS".to_string()).rank(), 999);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Level {
    #[default]
    Normal,
    Caution,
    Warning,
    Danger,
    Disconnected,
    Unknown,
}

impl Level {
    /// Fixed severity rank used for ordering; unknown levels sort last.
    pub fn rank(self) -> u16 {
        match self {
            Level::Normal => 1,
            Level::Caution => 2,
            Level::Warning => 3,
            Level::Danger => 4,
            Level::Disconnected => 5,
            Level::Unknown => 999,
        }
    }
}

impl std::fmt::Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Level::Normal => write!(f, "NORMAL"),
            Level::Caution => write!(f, "CAUTION"),
            Level::Warning => write!(f, "WARNING"),
            Level::Danger => write!(f, "DANGER"),
            Level::Disconnected => write!(f, "DISCONNECTED"),
            Level::Unknown => write!(f, "UNKNOWN"),
        }
    }
}

impl std::str::FromStr for Level {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "NORMAL" => Ok(Level::Normal),
            "CAUTION" => Ok(Level::Caution),
            "WARNING" => Ok(Level::Warning),
            "DANGER" => Ok(Level::Danger),
            "DISCONNECTED" => Ok(Level::Disconnected),
            _ => Err(format!("unknown level: {s}")),
        }
    }
}

impl From<String> for Level {
    fn from(s: String) -> Self {
        s.parse().unwrap_or(Level::Unknown)
    }
}

impl From<Level> for String {
    fn from(level: Level) -> Self {
        level.to_string()
    }
}

/// Comparison operator of a condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Operator {
    Gt,
    Ge,
    Lt,
    Le,
    Eq,
    Ne,
    Between,
}

impl Operator {
    /// Operator given to a single-value row when nothing more specific applies.
    pub const DEFAULT_SINGLE: Operator = Operator::Ge;
    /// The only operator a boolean field accepts.
    pub const BOOLEAN: Operator = Operator::Eq;

    pub fn is_range(self) -> bool {
        self == Operator::Between
    }
}

impl std::fmt::Display for Operator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Gt => write!(f, "GT"),
            Self::Ge => write!(f, "GE"),
            Self::Lt => write!(f, "LT"),
            Self::Le => write!(f, "LE"),
            Self::Eq => write!(f, "EQ"),
            Self::Ne => write!(f, "NE"),
            Self::Between => write!(f, "BETWEEN"),
        }
    }
}

impl std::str::FromStr for Operator {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "gt" | "greater_than" => Ok(Self::Gt),
            "ge" | "gte" | "greater_equal" => Ok(Self::Ge),
            "lt" | "less_than" => Ok(Self::Lt),
            "le" | "lte" | "less_equal" => Ok(Self::Le),
            "eq" | "equal" => Ok(Self::Eq),
            "ne" | "not_equal" => Ok(Self::Ne),
            "between" => Ok(Self::Between),
            _ => Err(format!("unknown operator: {s}")),
        }
    }
}

/// Whether a condition tests one bound or two.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConditionType {
    Single,
    Range,
}

impl std::fmt::Display for ConditionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Single => write!(f, "SINGLE"),
            Self::Range => write!(f, "RANGE"),
        }
    }
}

/// Numeric test of a condition. Only the bounds valid for the shape exist,
/// so a row can never carry both a threshold and a range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "conditionType", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Threshold {
    #[serde(rename_all = "camelCase")]
    Single {
        operator: Operator,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        threshold_value: Option<f64>,
    },
    #[serde(rename_all = "camelCase")]
    Range {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        left_value: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        right_value: Option<f64>,
    },
}

impl Threshold {
    pub fn single(operator: Operator) -> Self {
        Threshold::Single {
            operator,
            threshold_value: None,
        }
    }

    pub fn range() -> Self {
        Threshold::Range {
            left_value: None,
            right_value: None,
        }
    }

    pub fn condition_type(&self) -> ConditionType {
        match self {
            Threshold::Single { .. } => ConditionType::Single,
            Threshold::Range { .. } => ConditionType::Range,
        }
    }

    pub fn operator(&self) -> Operator {
        match self {
            Threshold::Single { operator, .. } => *operator,
            Threshold::Range { .. } => Operator::Between,
        }
    }

    /// Value used for ordering: the lower bound of a range, else the single
    /// threshold.
    pub fn effective_value(&self) -> Option<f64> {
        match self {
            Threshold::Single {
                threshold_value, ..
            } => *threshold_value,
            Threshold::Range { left_value, .. } => *left_value,
        }
    }
}

impl Default for Threshold {
    fn default() -> Self {
        Threshold::single(Operator::DEFAULT_SINGLE)
    }
}

/// One alerting rule on a sensor measurement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Condition {
    /// Assigned by the server; `None` until the row has been saved once.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    /// Device profile type the rule belongs to.
    #[serde(rename = "deviceProfileType", default)]
    pub profile_type: String,
    /// Measurement key (e.g. `temperature`); empty while not chosen yet.
    #[serde(default)]
    pub field_key: String,
    #[serde(default)]
    pub level: Level,
    #[serde(flatten)]
    pub threshold: Threshold,
    #[serde(default)]
    pub activate: bool,
    #[serde(default)]
    pub notification_enabled: bool,
}

impl Condition {
    /// A fresh, unsaved row as inserted by "add condition".
    pub fn new_draft(profile_type: &str) -> Self {
        Self {
            id: None,
            profile_type: profile_type.to_string(),
            field_key: String::new(),
            level: Level::Warning,
            threshold: Threshold::default(),
            activate: true,
            notification_enabled: false,
        }
    }

    pub fn condition_type(&self) -> ConditionType {
        self.threshold.condition_type()
    }

    pub fn operator(&self) -> Operator {
        self.threshold.operator()
    }

    pub fn threshold_value(&self) -> Option<f64> {
        match self.threshold {
            Threshold::Single {
                threshold_value, ..
            } => threshold_value,
            Threshold::Range { .. } => None,
        }
    }

    pub fn left_value(&self) -> Option<f64> {
        match self.threshold {
            Threshold::Range { left_value, .. } => left_value,
            Threshold::Single { .. } => None,
        }
    }

    pub fn right_value(&self) -> Option<f64> {
        match self.threshold {
            Threshold::Range { right_value, .. } => right_value,
            Threshold::Single { .. } => None,
        }
    }

    pub fn is_persisted(&self) -> bool {
        self.id.is_some()
    }

    /// An unsaved row still identical to what "add condition" inserted.
    /// Any edit, even to the level or a toggle, makes the row non-blank.
    pub fn is_blank_placeholder(&self) -> bool {
        self.id.is_none() && *self == Self::new_draft(&self.profile_type)
    }
}

/// One element of the `GET /event-settings` listing: the persisted
/// conditions of a device profile type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventSettingGroup {
    #[serde(rename = "deviceProfileType")]
    pub profile_type: String,
    #[serde(default)]
    pub conditions: Vec<Condition>,
}

/// Response body of `POST /event-settings`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedId {
    pub id: i64,
}
