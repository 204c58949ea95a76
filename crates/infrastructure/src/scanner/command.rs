use crate::process;
use async_trait::async_trait;
use ipnetwork::IpNetwork;
use macresolve_application::ports::NetworkScanner;
use macresolve_domain::DomainError;
use std::net::IpAddr;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanTool {
    /// `nmap -sn -n`: host discovery without port scan or DNS.
    Nmap,
    /// `arp-scan --quiet`: link-layer sweep of one interface.
    ArpScan,
}

impl ScanTool {
    pub fn default_program(&self) -> &'static str {
        match self {
            ScanTool::Nmap => "nmap",
            ScanTool::ArpScan => "arp-scan",
        }
    }
}

/// Scanner delegating to an external discovery tool. The tool's own probes populate the
/// kernel neighbor table; its output is not parsed.
pub struct CommandNetworkScanner {
    tool: ScanTool,
    program: String,
    interface: Option<String>,
    targets: Vec<IpNetwork>,
}

impl CommandNetworkScanner {
    pub fn new(tool: ScanTool, targets: Vec<IpNetwork>) -> Self {
        Self {
            tool,
            program: tool.default_program().to_string(),
            interface: None,
            targets,
        }
    }

    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    pub fn with_interface(mut self, interface: impl Into<String>) -> Self {
        self.interface = Some(interface.into());
        self
    }

    pub fn tool(&self) -> ScanTool {
        self.tool
    }

    /// Arguments for one invocation; an empty target list means the whole local segment,
    /// which only arp-scan can express.
    pub fn build_args(&self, targets: &[String]) -> Result<Vec<String>, DomainError> {
        let mut args = Vec::new();

        match self.tool {
            ScanTool::Nmap => {
                if targets.is_empty() {
                    return Err(DomainError::Scanner(
                        "nmap needs at least one target network".to_string(),
                    ));
                }
                args.push("-sn".to_string());
                args.push("-n".to_string());
                if let Some(interface) = &self.interface {
                    args.push("-e".to_string());
                    args.push(interface.clone());
                }
            }
            ScanTool::ArpScan => {
                let interface = self.interface.as_ref().ok_or_else(|| {
                    DomainError::Scanner("arp-scan needs an interface".to_string())
                })?;
                args.push(format!("--interface={}", interface));
                args.push("--quiet".to_string());
                if targets.is_empty() {
                    args.push("--localnet".to_string());
                }
            }
        }

        args.extend(targets.iter().cloned());
        Ok(args)
    }

    async fn invoke(
        &self,
        targets: Vec<String>,
        cancel: &CancellationToken,
    ) -> Result<(), DomainError> {
        let args = self.build_args(&targets)?;
        let output = process::run(&self.program, &args, cancel, DomainError::Scanner).await?;

        if !output.success() {
            return Err(DomainError::Scanner(format!(
                "{} exited with {}: {}",
                self.program,
                output.exit_code,
                output.combined_output()
            )));
        }

        debug!(
            tool = self.tool.default_program(),
            output_lines = output.stdout.lines().count(),
            "Scan tool finished"
        );
        Ok(())
    }
}

#[async_trait]
impl NetworkScanner for CommandNetworkScanner {
    async fn scan_all(&self, cancel: &CancellationToken) -> Result<(), DomainError> {
        let targets: Vec<String> = self.targets.iter().map(ToString::to_string).collect();
        info!(
            tool = self.tool.default_program(),
            networks = targets.len(),
            "Sweeping configured networks"
        );
        self.invoke(targets, cancel).await
    }

    async fn scan_addresses(
        &self,
        addresses: &[IpAddr],
        cancel: &CancellationToken,
    ) -> Result<(), DomainError> {
        if addresses.is_empty() {
            return Ok(());
        }

        let targets = addresses.iter().map(ToString::to_string).collect();
        self.invoke(targets, cancel).await
    }
}
