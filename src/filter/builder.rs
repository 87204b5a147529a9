use log::{debug, trace};
use std::cmp::Ordering;
use std::fmt;

use crate::filter::operator::Operator;
use crate::filter::validator::{self, Validation};
use crate::utils::error::{ArgumentKind, FilterError};

/// Assembles a capture filter expression one primitive at a time
///
/// The builder keeps the expression under construction in a buffer. `end`
/// copies the buffer onto a stack of finished expressions and `group`
/// parenthesizes the buffer, stacks it and starts a new one. `serialize`
/// joins the stack in the order it was filled.
///
/// ```
/// use capfilter::filter::ExpressionBuilder;
///
/// let mut builder = ExpressionBuilder::new();
/// builder
///     .begin()
///     .host("192.168.0.2", "")?
///     .concate()
///     .port(5060, "", "")?
///     .end()?;
/// assert_eq!(builder.serialize(), "host 192.168.0.2 and port 5060");
/// # Ok::<(), capfilter::utils::error::FilterError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct ExpressionBuilder {
    /// Expression currently under construction
    buffer: String,

    /// Finished expressions, in checkpoint order
    stack: Vec<String>,

    /// How primitive arguments are checked
    validation: Validation,

    /// Reject port ranges whose start is above their end
    check_range_order: bool,

    /// The first stacked entry is a group with an `and`/`or` prefix
    leading_group_operator: bool,
}

impl ExpressionBuilder {
    /// Create an empty builder with strict validation
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty builder with the given validation mode
    pub fn with_validation(validation: Validation) -> Self {
        Self {
            validation,
            ..Self::default()
        }
    }

    /// Enable or disable rejecting `portrange` bounds given high-to-low
    pub fn check_range_order(&mut self, enabled: bool) -> &mut Self {
        self.check_range_order = enabled;
        self
    }

    pub fn validation(&self) -> Validation {
        self.validation
    }

    /// Clear both the stack and the buffer
    pub fn init(&mut self) -> &mut Self {
        trace!("Resetting expression builder");
        self.stack.clear();
        self.buffer.clear();
        self.leading_group_operator = false;
        self
    }

    /// Start a fresh expression, dropping anything not yet checkpointed
    pub fn begin(&mut self) -> &mut Self {
        if !self.buffer.trim().is_empty() {
            debug!("Discarding unfinished expression '{}'", self.buffer.trim());
        }
        self.buffer.clear();
        self
    }

    /// Append `[src|dst] host <ip>`
    pub fn host(&mut self, ip: &str, direction: &str) -> Result<&mut Self, FilterError> {
        self.require_direction(direction)?;
        if !validator::is_valid_ip(ip) {
            return Err(FilterError::argument(ArgumentKind::IpAddress, ip));
        }

        self.append_primitive(&[direction, "host", ip]);
        Ok(self)
    }

    /// Append `[tcp|udp] [src|dst] port <port>`
    pub fn port(
        &mut self,
        port: impl fmt::Display,
        direction: &str,
        protocol: &str,
    ) -> Result<&mut Self, FilterError> {
        self.require_direction(direction)?;
        self.require_protocol(protocol)?;

        let port = port.to_string();
        if !self.validation.port(&port) {
            return Err(FilterError::argument(ArgumentKind::Port, port));
        }

        self.append_primitive(&[protocol, direction, "port", validator::canonical_port(&port)]);
        Ok(self)
    }

    /// Append `[tcp|udp] [src|dst] portrange <start>-<end>`
    ///
    /// The bounds are not required to be in ascending order unless
    /// [`check_range_order`](Self::check_range_order) is enabled.
    pub fn port_range(
        &mut self,
        start: impl fmt::Display,
        end: impl fmt::Display,
        direction: &str,
        protocol: &str,
    ) -> Result<&mut Self, FilterError> {
        self.require_direction(direction)?;
        self.require_protocol(protocol)?;

        let (start, end) = (start.to_string(), end.to_string());
        let range = format!("{}-{}", start, end);
        if !self.validation.port(&start) || !self.validation.port(&end) {
            return Err(FilterError::argument(ArgumentKind::PortRange, range));
        }

        let (start, end) = (validator::canonical_port(&start), validator::canonical_port(&end));
        if self.check_range_order && compare_ports(start, end) == Ordering::Greater {
            return Err(FilterError::argument(ArgumentKind::PortRange, range));
        }

        let bounds = format!("{}-{}", start, end);
        self.append_primitive(&[protocol, direction, "portrange", &bounds]);
        Ok(self)
    }

    /// Append the `and` operator
    pub fn concate(&mut self) -> &mut Self {
        self.append_operator(Operator::And)
    }

    /// Append the `or` operator
    pub fn alternate(&mut self) -> &mut Self {
        self.append_operator(Operator::Or)
    }

    /// Append the `not` operator
    pub fn negate(&mut self) -> &mut Self {
        self.append_operator(Operator::Not)
    }

    /// Parenthesize the buffer, stack it and start a new expression
    ///
    /// When `operator` is a recognised spelling (see [`Operator::from_alias`])
    /// the group is prefixed with that operator. Unrecognised values group
    /// without a prefix.
    pub fn group(&mut self, operator: Option<&str>) -> Result<&mut Self, FilterError> {
        let content = self.buffer.trim();
        if content.is_empty() {
            return Err(FilterError::InvalidState("nothing to group, the expression is empty"));
        }

        let op = match operator {
            Some(alias) => {
                let op = Operator::from_alias(alias);
                if op.is_none() {
                    debug!("Ignoring unknown group operator '{}'", alias);
                }
                op
            }
            None => None,
        };
        let prefix = op.map_or("", Operator::as_text);
        if self.stack.is_empty() {
            self.leading_group_operator = matches!(op, Some(Operator::And | Operator::Or));
        }

        let grouped = format!("{}({})", prefix, content);
        debug!("Stacking group '{}'", grouped.trim());
        self.stack.push(grouped);
        self.buffer.clear();
        Ok(self)
    }

    /// Copy the buffer onto the stack
    ///
    /// The buffer itself is left as is, so ending twice without a `begin`
    /// in between stacks the same expression twice.
    pub fn end(&mut self) -> Result<&mut Self, FilterError> {
        if self.buffer.trim().is_empty() {
            return Err(FilterError::InvalidState("nothing to end, the expression is empty"));
        }

        debug!("Stacking expression '{}'", self.buffer.trim());
        self.stack.push(self.buffer.clone());
        Ok(self)
    }

    /// Join the stacked expressions into the final filter string
    ///
    /// When the first entry is a group prefixed with `and`/`or`, that
    /// operator has no left operand and is left out. Entries stacked by
    /// `end` are written out as they are.
    pub fn serialize(&self) -> String {
        let mut out = String::new();
        for (i, entry) in self.stack.iter().enumerate() {
            let mut entry = entry.trim();
            if i == 0 && self.leading_group_operator {
                entry = strip_dangling_operator(entry);
            }
            if entry.is_empty() {
                continue;
            }
            if !out.is_empty() {
                out.push(' ');
            }
            out.push_str(entry);
        }
        out.trim().to_string()
    }

    /// Finished expressions in checkpoint order
    pub fn stack(&self) -> &[String] {
        &self.stack
    }

    /// Expression currently under construction
    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    fn require_direction(&self, direction: &str) -> Result<(), FilterError> {
        if self.validation.direction(direction) {
            Ok(())
        } else {
            Err(FilterError::argument(ArgumentKind::Direction, direction))
        }
    }

    fn require_protocol(&self, protocol: &str) -> Result<(), FilterError> {
        if self.validation.protocol(protocol) {
            Ok(())
        } else {
            Err(FilterError::argument(ArgumentKind::Protocol, protocol))
        }
    }

    fn append_primitive(&mut self, words: &[&str]) {
        let primitive = words
            .iter()
            .map(|w| w.trim())
            .filter(|w| !w.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        trace!("Appending primitive '{}'", primitive);
        self.buffer.push_str(&primitive);
    }

    fn append_operator(&mut self, op: Operator) -> &mut Self {
        trace!("Appending operator '{}'", op);
        self.buffer.push_str(op.as_text());
        self
    }
}

impl fmt::Display for ExpressionBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.serialize())
    }
}

fn strip_dangling_operator(entry: &str) -> &str {
    ["and ", "or "]
        .iter()
        .find_map(|op| entry.strip_prefix(op))
        .map(str::trim_start)
        .unwrap_or(entry)
}

// Both sides are canonical digit strings, possibly longer than a u64
fn compare_ports(a: &str, b: &str) -> Ordering {
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}
