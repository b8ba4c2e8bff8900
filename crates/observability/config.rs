use std::env;

#[derive(Clone)]
pub(crate) struct ServiceContext {
    pub(crate) service_name: String,
    pub(crate) environment: String,
    pub(crate) component: String,
}

#[derive(Clone)]
pub(crate) struct ObservabilityConfig {
    pub(crate) service_context: ServiceContext,
    /// Captured during parsing and logged once tracing is up.
    pub(crate) warnings: Vec<String>,
}

impl ObservabilityConfig {
    pub(crate) fn from_env(component: &str) -> Self {
        let component = component.trim().to_string();
        let mut warnings = Vec::new();

        let service_name = env_string("SERVICE_NAME")
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| component.clone());

        let environment = match env_string("STAGE").filter(|v| !v.is_empty()) {
            Some(stage) => stage,
            None => {
                warnings.push("STAGE is not set; logging environment as \"unknown\"".to_string());
                "unknown".to_string()
            }
        };

        Self {
            service_context: ServiceContext {
                service_name,
                environment,
                component,
            },
            warnings,
        }
    }
}

fn env_string(key: &str) -> Option<String> {
    env::var(key).ok().map(|v| v.trim().to_string())
}
