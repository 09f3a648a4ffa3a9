// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Fully-qualified topic names
//!
//! `<type>.<app>/<instance>.<name>`, e.g. `int.svc/default.price`.
//! Topics double as subscription prefixes, so their bytes must be stable.

use crate::codec::ValueKind;
use crate::error::ContextError;

/// Application and instance names shared by every endpoint in a process
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    app_name: String,
    instance_name: String,
}

impl Identity {
    pub fn new(app_name: impl Into<String>, instance_name: impl Into<String>) -> Result<Self, ContextError> {
        let app_name = app_name.into();
        let instance_name = instance_name.into();
        check_name("app", &app_name)?;
        check_name("instance", &instance_name)?;
        Ok(Self {
            app_name,
            instance_name,
        })
    }

    pub fn app_name(&self) -> &str {
        &self.app_name
    }

    pub fn instance_name(&self) -> &str {
        &self.instance_name
    }

    /// Topic for an endpoint called `name` carrying `kind` values
    pub fn qualify(&self, kind: ValueKind, name: &str) -> String {
        qualified_name(kind, &self.app_name, &self.instance_name, name)
    }
}

/// `<type>.<app>/<instance>.<name>`
pub fn qualified_name(kind: ValueKind, app_name: &str, instance_name: &str, name: &str) -> String {
    format!("{}.{}/{}.{}", kind.type_name(), app_name, instance_name, name)
}

// Names become path components of the topology file
fn check_name(kind: &'static str, name: &str) -> Result<(), ContextError> {
    if name.is_empty() || name == "." || name == ".." || name.contains(['/', '\\']) {
        return Err(ContextError::InvalidName {
            kind,
            name: name.to_string(),
        });
    }
    Ok(())
}
