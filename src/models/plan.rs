use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;

use crate::filter::{ExpressionBuilder, Validation};
use crate::models::options::CaptureOptions;
use crate::utils::error::{AppError, AppResult, FilterError};

/// A port given either as a JSON number or a string
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PortValue {
    Number(u64),
    Text(String),
}

impl fmt::Display for PortValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PortValue::Number(n) => write!(f, "{}", n),
            PortValue::Text(s) => f.write_str(s),
        }
    }
}

/// One call on the expression builder
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum FilterStep {
    Init,
    Begin,
    Host {
        ip: String,
        #[serde(default)]
        direction: String,
    },
    Port {
        port: PortValue,
        #[serde(default)]
        direction: String,
        #[serde(default)]
        protocol: String,
    },
    PortRange {
        start: PortValue,
        end: PortValue,
        #[serde(default)]
        direction: String,
        #[serde(default)]
        protocol: String,
    },
    #[serde(alias = "concate")]
    And,
    #[serde(alias = "alternate")]
    Or,
    #[serde(alias = "negate")]
    Not,
    Group {
        #[serde(default)]
        operator: Option<String>,
    },
    End,
}

impl FilterStep {
    /// Run this step against a builder
    pub fn apply(&self, builder: &mut ExpressionBuilder) -> Result<(), FilterError> {
        match self {
            FilterStep::Init => {
                builder.init();
            }
            FilterStep::Begin => {
                builder.begin();
            }
            FilterStep::Host { ip, direction } => {
                builder.host(ip, direction)?;
            }
            FilterStep::Port { port, direction, protocol } => {
                builder.port(port, direction, protocol)?;
            }
            FilterStep::PortRange { start, end, direction, protocol } => {
                builder.port_range(start, end, direction, protocol)?;
            }
            FilterStep::And => {
                builder.concate();
            }
            FilterStep::Or => {
                builder.alternate();
            }
            FilterStep::Not => {
                builder.negate();
            }
            FilterStep::Group { operator } => {
                builder.group(operator.as_deref())?;
            }
            FilterStep::End => {
                builder.end()?;
            }
        }
        Ok(())
    }
}

/// A capture description: command options plus the steps that build its filter
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CapturePlan {
    /// Options for the capture command
    pub options: CaptureOptions,

    /// How strictly primitive arguments are checked
    pub validation: Validation,

    /// Reject port ranges given high-to-low
    pub check_range_order: bool,

    /// Builder calls, in order
    pub steps: Vec<FilterStep>,
}

impl CapturePlan {
    /// Load a plan from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref();
        info!("Loading capture plan from {}", path.display());
        let contents = fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    /// Parse a plan from JSON text
    pub fn from_json(json: &str) -> AppResult<Self> {
        let plan: CapturePlan = serde_json::from_str(json)?;
        debug!("Plan has {} filter steps", plan.steps.len());
        Ok(plan)
    }

    /// Append steps for a quick `host`/`port` filter
    ///
    /// Host and port are joined with `and`. On an empty plan the result is
    /// ended as is; otherwise it is grouped and `and`-ed onto what the plan
    /// already builds. Does nothing when both are `None`.
    pub fn push_quick_filter(&mut self, host: Option<&str>, port: Option<&str>) -> &mut Self {
        if host.is_none() && port.is_none() {
            return self;
        }

        let joins_plan = !self.steps.is_empty();
        self.steps.push(FilterStep::Begin);
        if let Some(ip) = host {
            self.steps.push(FilterStep::Host {
                ip: ip.to_string(),
                direction: String::new(),
            });
        }
        if let Some(port) = port {
            if host.is_some() {
                self.steps.push(FilterStep::And);
            }
            self.steps.push(FilterStep::Port {
                port: PortValue::Text(port.to_string()),
                direction: String::new(),
                protocol: String::new(),
            });
        }
        self.steps.push(if joins_plan {
            FilterStep::Group {
                operator: Some("and".to_string()),
            }
        } else {
            FilterStep::End
        });
        self
    }

    /// Replay the steps into a fresh builder and serialize the result
    ///
    /// Errors name the position of the failing step. A plan whose last
    /// steps are never ended or grouped loses them, just like the builder.
    pub fn build_expression(&self) -> AppResult<String> {
        let mut builder = ExpressionBuilder::with_validation(self.validation);
        builder.check_range_order(self.check_range_order);

        for (index, step) in self.steps.iter().enumerate() {
            step.apply(&mut builder).map_err(|e| {
                AppError::PlanError(format!("step {} ({:?}) failed: {}", index + 1, step, e))
            })?;
        }

        if !builder.buffer().trim().is_empty() {
            debug!("Unfinished expression '{}' was not stacked", builder.buffer().trim());
        }

        Ok(builder.serialize())
    }
}
