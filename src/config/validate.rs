// src/config/validate.rs

use crate::config::model::{ConfigFile, OptionsSection, RawConfigFile, RedactSection};
use crate::errors::{ProcrunError, Result};
use crate::redact::Redactor;

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = crate::errors::ProcrunError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        validate_options(&raw.options)?;
        let redactor = build_redactor(&raw.redact)?;
        Ok(ConfigFile::new_unchecked(raw.options, raw.redact, redactor))
    }
}

fn validate_options(options: &OptionsSection) -> Result<()> {
    if let Some(cwd) = &options.cwd {
        if cwd.as_os_str().is_empty() {
            return Err(ProcrunError::ConfigError(
                "[options].cwd must not be empty".to_string(),
            ));
        }
    }

    for key in options.env.keys() {
        if key.is_empty() || key.contains('=') {
            return Err(ProcrunError::ConfigError(format!(
                "[options.env] has invalid variable name '{}'",
                key
            )));
        }
    }

    Ok(())
}

fn build_redactor(redact: &RedactSection) -> Result<Redactor> {
    let mut redactor = Redactor::new(&redact.patterns).map_err(|e| {
        ProcrunError::ConfigError(format!("[redact].patterns contains an invalid regex: {e}"))
    })?;

    if let Some(replacement) = &redact.replacement {
        if replacement.is_empty() {
            return Err(ProcrunError::ConfigError(
                "[redact].replacement must not be empty".to_string(),
            ));
        }
        redactor = redactor.with_replacement(replacement.clone());
    }

    Ok(redactor)
}
