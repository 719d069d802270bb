use serde::Serialize;
use std::fmt;

/// Rule groups, reported in this order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum RuleCategory {
    PreGeneration,
    Structural,
    Completeness,
}

impl fmt::Display for RuleCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RuleCategory::PreGeneration => "pre-generation",
            RuleCategory::Structural => "structural",
            RuleCategory::Completeness => "completeness",
        })
    }
}

macro_rules! define_rules {
    ( $( $category:ident => [ $( $variant:ident = $id:literal ),* $(,)? ] ),* $(,)? ) => {
        /// Identifier of a validation rule.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum RuleId {
            $( $( $variant, )* )*
        }

        impl RuleId {
            /// Every rule in evaluation order.
            pub const ALL: &'static [RuleId] = &[ $( $( RuleId::$variant, )* )* ];

            pub fn id(&self) -> &'static str {
                match self {
                    $( $( RuleId::$variant => $id, )* )*
                }
            }

            pub fn category(&self) -> RuleCategory {
                match self {
                    $( $( RuleId::$variant => RuleCategory::$category, )* )*
                }
            }
        }
    };
}

define_rules! {
    PreGeneration => [
        ParseTextDescription = "parseTextDescription",
        IdentifyComponents = "identifyComponents",
        MapBusinessLogic = "mapBusinessLogic",
        PlanErrorHandling = "planErrorHandling",
    ],
    Structural => [
        ValidateJsonSyntax = "validateJsonSyntax",
        CheckNodeIdUniqueness = "checkNodeIdUniqueness",
        VerifyConnectionIntegrity = "verifyConnectionIntegrity",
        TriggerPresent = "triggerPresent",
        ActionPresent = "actionPresent",
        EnsureAllNodesConnected = "ensureAllNodesConnected",
        ValidateCredentialReferences = "validateCredentialReferences",
        ValidateNodeNames = "validateNodeNames",
    ],
    Completeness => [
        AllActionsImplemented = "allActionsImplemented",
        ErrorHandlingIncluded = "errorHandlingIncluded",
        CheckMissingParameters = "checkMissingParameters",
        MinimumNodes = "minimumNodes",
        MaximumNodes = "maximumNodes",
    ],
}

impl RuleId {
    /// Failures of these rules make a graph unsafe to hand to the runtime.
    pub fn is_blocking(&self) -> bool {
        self.category() == RuleCategory::Structural
            || matches!(self, RuleId::MinimumNodes | RuleId::MaximumNodes)
    }
}

impl Serialize for RuleId {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.id())
    }
}

impl fmt::Display for RuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Outcome of one rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleResult {
    pub rule_id: RuleId,
    pub category: RuleCategory,
    pub passed: bool,
    pub message: String,
}

impl RuleResult {
    pub fn new(rule_id: RuleId, passed: bool, message: impl Into<String>) -> Self {
        Self {
            rule_id,
            category: rule_id.category(),
            passed,
            message: message.into(),
        }
    }
}
