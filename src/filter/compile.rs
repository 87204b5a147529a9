use log::{debug, info};
use pcap::{Capture, Linktype};

use crate::utils::error::AppResult;

/// Compile an expression with libpcap and return the BPF instruction count
///
/// Uses a dead Ethernet capture, so no device or privileges are needed.
pub fn compile_check(expression: &str) -> AppResult<usize> {
    debug!("Compiling filter '{}' with libpcap", expression);
    let capture = Capture::dead(Linktype::ETHERNET)?;
    let program = capture.compile(expression, true)?;
    let instructions = program.get_instructions().len();
    info!("Filter compiled to {} BPF instructions", instructions);
    Ok(instructions)
}
