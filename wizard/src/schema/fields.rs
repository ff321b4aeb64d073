//! Field names and closed value sets

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::WizardError;

/// A closed set of string values
pub trait Choice: Copy + Sized + 'static {
    /// Every member, in display order
    const ALL: &'static [Self];

    /// Wire value
    fn as_str(&self) -> &'static str;

    /// Human-readable value for the review summary
    fn display_name(&self) -> &'static str;

    /// Parse a wire value, exact match only
    fn parse(raw: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|c| c.as_str() == raw)
    }

    /// Comma separated wire values
    fn allowed() -> String {
        Self::ALL
            .iter()
            .map(|c| c.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

macro_rules! choice {
    (
        $(#[$meta:meta])*
        pub enum $name:ident { $($variant:ident => ($wire:literal, $display:literal)),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(#[serde(rename = $wire)] $variant),+
        }

        impl Choice for $name {
            const ALL: &'static [Self] = &[$($name::$variant),+];

            fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $wire),+
                }
            }

            fn display_name(&self) -> &'static str {
                match self {
                    $($name::$variant => $display),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

choice! {
    /// Target environment
    pub enum Environment {
        Dev => ("dev", "Development"),
        Staging => ("staging", "Staging"),
        Prod => ("prod", "Production"),
    }
}

choice! {
    /// Discriminant of the deployment record
    pub enum ServiceType {
        Database => ("database", "Database"),
        WebApp => ("webapp", "Web App"),
    }
}

choice! {
    /// Database engine
    pub enum Engine {
        Postgres => ("postgres", "PostgreSQL"),
        Mysql => ("mysql", "MySQL"),
    }
}

choice! {
    /// Web application framework
    pub enum Framework {
        Nextjs => ("nextjs", "Next.js"),
        Nuxt => ("nuxt", "Nuxt"),
        Python => ("python", "Python"),
    }
}

/// Every field the wizard knows about
///
/// Ordering follows the form, so error maps keyed by field render top to bottom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FieldName {
    ProjectName,
    Owner,
    Environment,
    ServiceType,
    Engine,
    StorageSize,
    Framework,
    PublicAccess,
}

impl FieldName {
    pub const ALL: [FieldName; 8] = [
        FieldName::ProjectName,
        FieldName::Owner,
        FieldName::Environment,
        FieldName::ServiceType,
        FieldName::Engine,
        FieldName::StorageSize,
        FieldName::Framework,
        FieldName::PublicAccess,
    ];

    /// Schema name of the field
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldName::ProjectName => "projectName",
            FieldName::Owner => "owner",
            FieldName::Environment => "environment",
            FieldName::ServiceType => "serviceType",
            FieldName::Engine => "engine",
            FieldName::StorageSize => "storageSize",
            FieldName::Framework => "framework",
            FieldName::PublicAccess => "publicAccess",
        }
    }

    /// Review label
    pub fn label(&self) -> &'static str {
        match self {
            FieldName::ProjectName => "Project Name",
            FieldName::Owner => "Owner",
            FieldName::Environment => "Environment",
            FieldName::ServiceType => "Service Type",
            FieldName::Engine => "Database Engine",
            FieldName::StorageSize => "Storage Size",
            FieldName::Framework => "Framework",
            FieldName::PublicAccess => "Public Access",
        }
    }

    /// The variant a field belongs to, `None` for common fields and the discriminant
    pub fn variant(&self) -> Option<ServiceType> {
        match self {
            FieldName::Engine | FieldName::StorageSize => Some(ServiceType::Database),
            FieldName::Framework | FieldName::PublicAccess => Some(ServiceType::WebApp),
            _ => None,
        }
    }

    /// Message shown when a required value is missing
    pub(crate) fn missing_message(&self) -> String {
        match self {
            FieldName::ProjectName => "Project name is required".to_string(),
            FieldName::Owner => "Owner is required".to_string(),
            FieldName::Environment => "Environment is required".to_string(),
            FieldName::ServiceType => "Please select a service type".to_string(),
            FieldName::Engine => "Please select a database engine".to_string(),
            FieldName::StorageSize => "Storage size must be greater than 0".to_string(),
            FieldName::Framework => "Please select a framework".to_string(),
            FieldName::PublicAccess => "Public access must be true or false".to_string(),
        }
    }

    /// Message shown when a value is present but unreadable
    pub(crate) fn invalid_message(&self) -> String {
        match self {
            FieldName::ProjectName => "Project name must be text".to_string(),
            FieldName::Owner => "Owner must be text".to_string(),
            FieldName::Environment => {
                format!("Environment must be one of: {}", Environment::allowed())
            }
            FieldName::ServiceType => {
                format!("Service type must be one of: {}", ServiceType::allowed())
            }
            FieldName::Engine => format!("Engine must be one of: {}", Engine::allowed()),
            FieldName::StorageSize => "Storage size must be a number".to_string(),
            FieldName::Framework => format!("Framework must be one of: {}", Framework::allowed()),
            FieldName::PublicAccess => "Public access must be true or false".to_string(),
        }
    }
}

impl fmt::Display for FieldName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldName {
    type Err = WizardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FieldName::ALL
            .iter()
            .copied()
            .find(|f| f.as_str() == s)
            .ok_or_else(|| WizardError::UnknownField(s.to_string()))
    }
}
