//! `Settings` plugin - user preferences such as timezone and units

use super::lock;
use callgate_domain::{
    FunctionDescriptor, InvocationError, ParamKind, ParameterSpec, Plugin, PluginFunction,
};
use std::sync::{Arc, Mutex};
use tracing::info;

pub const PLUGIN_NAME: &str = "Settings";

pub const DEFAULT_TIMEZONE: &str = "UTC";

#[derive(Debug)]
struct Preferences {
    timezone: String,
    temperature_unit: String,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            timezone: DEFAULT_TIMEZONE.to_string(),
            temperature_unit: "celsius".to_string(),
        }
    }
}

pub struct SettingsPlugin {
    functions: Vec<PluginFunction>,
}

impl SettingsPlugin {
    pub fn new() -> Self {
        let prefs = Arc::new(Mutex::new(Preferences::default()));
        Self {
            functions: vec![
                set_timezone(prefs.clone()),
                get_timezone(prefs.clone()),
                set_temperature_unit(prefs),
            ],
        }
    }
}

impl Default for SettingsPlugin {
    fn default() -> Self {
        Self::new()
    }
}

impl Plugin for SettingsPlugin {
    fn name(&self) -> &str {
        PLUGIN_NAME
    }

    fn description(&self) -> &str {
        "Read and change user preferences"
    }

    fn functions(&self) -> &[PluginFunction] {
        &self.functions
    }
}

fn set_timezone(prefs: Arc<Mutex<Preferences>>) -> PluginFunction {
    let descriptor = FunctionDescriptor::new("set_timezone", "Change the user's timezone")
        .with_parameter(
            ParameterSpec::text("timezone").with_description("IANA name, e.g. Europe/Berlin"),
        );

    PluginFunction::sync(descriptor, move |args| {
        let timezone = args.text("timezone")?.trim().to_string();
        if timezone.is_empty() {
            return Err(InvocationError::new("timezone must not be empty"));
        }
        let mut prefs = lock(&prefs)?;
        let previous = std::mem::replace(&mut prefs.timezone, timezone.clone());
        info!(from = %previous, to = %timezone, "Timezone changed");
        Ok(format!("Timezone changed from {} to {}", previous, timezone))
    })
}

fn get_timezone(prefs: Arc<Mutex<Preferences>>) -> PluginFunction {
    let descriptor = FunctionDescriptor::new("get_timezone", "Current timezone");

    PluginFunction::sync(descriptor, move |_args| Ok(lock(&prefs)?.timezone.clone()))
}

fn set_temperature_unit(prefs: Arc<Mutex<Preferences>>) -> PluginFunction {
    let descriptor = FunctionDescriptor::new("set_temperature_unit", "Choose how temperatures are shown")
        .with_parameter(ParameterSpec::new(
            "unit",
            ParamKind::enumeration(["celsius", "fahrenheit"]),
        ));

    PluginFunction::unit(descriptor, move |args| {
        let prefs = prefs.clone();
        async move {
            let unit = args.text("unit")?.to_string();
            lock(&prefs)?.temperature_unit = unit;
            Ok(())
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use callgate_domain::{ArgValue, InvocationArgs};

    async fn call(plugin: &SettingsPlugin, function: &str, args: InvocationArgs) -> Result<String, InvocationError> {
        plugin.function(function).unwrap().invoke(args).await.map(|o| o.into_text())
    }

    #[tokio::test]
    async fn test_timezone_defaults_to_utc() {
        let plugin = SettingsPlugin::new();
        assert_eq!(call(&plugin, "get_timezone", InvocationArgs::new()).await.unwrap(), "UTC");
    }

    #[tokio::test]
    async fn test_set_timezone_round_trip() {
        let plugin = SettingsPlugin::new();
        let args = InvocationArgs::new().with("timezone", ArgValue::Text("Asia/Tokyo".into()));
        assert_eq!(
            call(&plugin, "set_timezone", args).await.unwrap(),
            "Timezone changed from UTC to Asia/Tokyo"
        );
        assert_eq!(
            call(&plugin, "get_timezone", InvocationArgs::new()).await.unwrap(),
            "Asia/Tokyo"
        );
    }

    #[tokio::test]
    async fn test_temperature_unit_returns_nothing() {
        let plugin = SettingsPlugin::new();
        let args = InvocationArgs::new().with("unit", ArgValue::Enum("fahrenheit".into()));
        assert_eq!(call(&plugin, "set_temperature_unit", args).await.unwrap(), "");
    }
}
