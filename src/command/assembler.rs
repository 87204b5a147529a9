use log::debug;

use crate::models::options::CaptureOptions;

/// Characters that force an argument to be quoted
const SHELL_SPECIAL: &[char] = &[
    ' ', '\t', '\n', '"', '\'', '\\', '$', '`', '&', '|', ';', '<', '>', '(', ')', '*', '?', '[',
    ']', '#', '~', '!', '{', '}',
];

/// Turns capture options and a filter expression into a capture command line
pub struct CommandAssembler {
    options: CaptureOptions,
}

impl CommandAssembler {
    /// Create an assembler for the given options
    pub fn new(options: CaptureOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &CaptureOptions {
        &self.options
    }

    /// Build the argument vector, program name first
    ///
    /// The filter is passed as a single trailing argument and is left out
    /// when it is blank.
    pub fn args(&self, filter: &str) -> Vec<String> {
        let opts = &self.options;
        let mut args = vec![opts.tool.clone()];

        if let Some(interface) = &opts.interface {
            args.push("-i".to_string());
            args.push(interface.clone());
        }
        if let Some(path) = &opts.read_file {
            args.push("-r".to_string());
            args.push(path.clone());
        }
        if opts.no_resolve {
            args.push("-n".to_string());
        }
        if opts.no_promiscuous {
            args.push("-p".to_string());
        }
        if opts.verbosity > 0 {
            args.push(format!("-{}", "v".repeat(opts.verbosity.min(3) as usize)));
        }
        if let Some(count) = opts.count {
            args.push("-c".to_string());
            args.push(count.to_string());
        }
        if let Some(snaplen) = opts.snaplen {
            args.push("-s".to_string());
            args.push(snaplen.to_string());
        }
        if let Some(size) = opts.buffer_size {
            args.push("-B".to_string());
            args.push(size.to_string());
        }
        if let Some(path) = &opts.write_file {
            args.push("-w".to_string());
            args.push(path.clone());
        }
        args.extend(opts.extra_args.iter().cloned());

        let filter = filter.trim();
        if !filter.is_empty() {
            args.push(filter.to_string());
        }

        args
    }

    /// Build the command as one shell-ready string
    ///
    /// The filter is always double-quoted. Other arguments are quoted only
    /// when they contain whitespace or shell metacharacters.
    pub fn assemble(&self, filter: &str) -> String {
        let mut parts: Vec<String> = self
            .args("")
            .iter()
            .map(|arg| quote_if_needed(arg))
            .collect();

        let filter = filter.trim();
        if !filter.is_empty() {
            parts.push(quote(filter));
        }

        let command = parts.join(" ");
        debug!("Assembled capture command: {}", command);
        command
    }
}

/// Wrap an argument in double quotes, escaping what the shell would expand
pub fn quote(arg: &str) -> String {
    let mut quoted = String::with_capacity(arg.len() + 2);
    quoted.push('"');
    for c in arg.chars() {
        if matches!(c, '"' | '\\' | '$' | '`') {
            quoted.push('\\');
        }
        quoted.push(c);
    }
    quoted.push('"');
    quoted
}

fn quote_if_needed(arg: &str) -> String {
    if arg.is_empty() || arg.contains(SHELL_SPECIAL) {
        quote(arg)
    } else {
        arg.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_give_bare_tool() {
        let assembler = CommandAssembler::new(CaptureOptions::default());
        assert_eq!(assembler.args(""), vec!["tcpdump".to_string()]);
        assert_eq!(assembler.assemble("  "), "tcpdump");
    }

    #[test]
    fn test_flag_order() {
        let options = CaptureOptions {
            tool: "windump".to_string(),
            interface: Some("eth0".to_string()),
            count: Some(100),
            snaplen: Some(65535),
            buffer_size: Some(4096),
            write_file: Some("out.pcap".to_string()),
            read_file: None,
            no_resolve: true,
            verbosity: 2,
            no_promiscuous: true,
            extra_args: vec!["-U".to_string()],
        };
        let assembler = CommandAssembler::new(options);
        assert_eq!(
            assembler.assemble("host 192.168.0.2 and port 5060"),
            "windump -i eth0 -n -p -vv -c 100 -s 65535 -B 4096 -w out.pcap -U \"host 192.168.0.2 and port 5060\""
        );
    }

    #[test]
    fn test_args_keep_filter_unquoted() {
        let options = CaptureOptions::default().with_interface("lo").with_count(5);
        let args = CommandAssembler::new(options).args("udp port 53");
        assert_eq!(args, vec!["tcpdump", "-i", "lo", "-c", "5", "udp port 53"]);
    }

    #[test]
    fn test_verbosity_is_capped() {
        let options = CaptureOptions {
            verbosity: 9,
            ..CaptureOptions::default()
        };
        assert_eq!(CommandAssembler::new(options).assemble(""), "tcpdump -vvv");
    }

    #[test]
    fn test_paths_with_spaces_are_quoted() {
        let options = CaptureOptions {
            read_file: Some("my captures/day 1.pcap".to_string()),
            ..CaptureOptions::default()
        };
        assert_eq!(
            CommandAssembler::new(options).assemble("port 80"),
            "tcpdump -r \"my captures/day 1.pcap\" \"port 80\""
        );
    }

    #[test]
    fn test_quote_escapes_shell_expansion() {
        assert_eq!(quote("a\"b$c`d\\e"), "\"a\\\"b\\$c\\`d\\\\e\"");
    }
}
