use serde::{Deserialize, Serialize};

/// Options for the capture command a filter is handed to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureOptions {
    /// Capture program to invoke
    pub tool: String,

    /// Network interface to capture from
    pub interface: Option<String>,

    /// Stop after this many packets
    pub count: Option<u64>,

    /// Bytes to keep from each packet
    pub snaplen: Option<u32>,

    /// Kernel buffer size in KiB
    pub buffer_size: Option<u32>,

    /// Write raw packets to this file instead of printing them
    pub write_file: Option<String>,

    /// Read packets from a capture file instead of an interface
    pub read_file: Option<String>,

    /// Don't convert addresses to names
    pub no_resolve: bool,

    /// Verbosity, 0 to 3
    pub verbosity: u8,

    /// Don't put the interface into promiscuous mode
    pub no_promiscuous: bool,

    /// Extra arguments passed through before the filter
    pub extra_args: Vec<String>,
}

impl Default for CaptureOptions {
    fn default() -> Self {
        Self {
            tool: "tcpdump".to_string(),
            interface: None,
            count: None,
            snaplen: None,
            buffer_size: None,
            write_file: None,
            read_file: None,
            no_resolve: false,
            verbosity: 0,
            no_promiscuous: false,
            extra_args: Vec::new(),
        }
    }
}

impl CaptureOptions {
    /// Set the interface
    pub fn with_interface(mut self, interface: impl Into<String>) -> Self {
        self.interface = Some(interface.into());
        self
    }

    /// Set the packet count
    pub fn with_count(mut self, count: u64) -> Self {
        self.count = Some(count);
        self
    }

    /// Set the output file
    pub fn with_write_file(mut self, path: impl Into<String>) -> Self {
        self.write_file = Some(path.into());
        self
    }
}
