use clap::Parser;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

use crate::image2text::OcrConfig;
use crate::process::ProcessorConfig;

pub const DEFAULT_MAX_BODY_BYTES: usize = 20 * 1024 * 1024;

/// Server configuration, read from CLI flags or the environment.
#[derive(Clone, Debug, Parser)]
#[command(version, about = "HTTP service extracting text from images", long_about = None)]
pub struct ServerConfig {
    /// IP address to bind, hostnames such as `localhost` are not accepted
    #[arg(long, env = "BIND_ADDR", default_value_t = IpAddr::V4(Ipv4Addr::UNSPECIFIED))]
    pub host: IpAddr,

    #[arg(short = 'p', long, env = "PORT", default_value_t = 3210)]
    pub port: u16,

    /// Externally reachable URL, only used for the startup log line
    #[arg(long, env = "BACKEND_URL")]
    pub public_url: Option<String>,

    #[arg(long, env = "OCR_LANGUAGE", default_value = "eng", help = "Language model loaded by every session")]
    pub language: String,

    #[arg(long, env = "OCR_DPI")]
    pub dpi: Option<u32>,

    #[arg(long, env = "OCR_PSM", help = "Tesseract page segmentation mode")]
    pub psm: Option<u32>,

    #[arg(long, env = "OCR_OEM", help = "Tesseract OCR engine mode")]
    pub oem: Option<u32>,

    #[arg(
        long,
        env = "OCR_MAX_SESSIONS",
        default_value_t = 0,
        help = "Maximum concurrently open recognition sessions (0 = unbounded)"
    )]
    pub max_sessions: usize,

    #[arg(long, env = "MAX_BODY_BYTES", default_value_t = DEFAULT_MAX_BODY_BYTES)]
    pub max_body_bytes: usize,

    /// Directory uploaded files are written to while they are processed
    #[arg(long, env = "UPLOAD_DIR")]
    pub upload_dir: Option<PathBuf>,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    pub fn public_url(&self) -> String {
        self.public_url
            .clone()
            .unwrap_or_else(|| format!("http://localhost:{}", self.port))
    }

    pub fn upload_dir(&self) -> PathBuf {
        self.upload_dir.clone().unwrap_or_else(std::env::temp_dir)
    }

    pub fn ocr_config(&self) -> OcrConfig {
        OcrConfig::new(self.dpi, self.psm, self.oem)
    }

    pub fn processor_config(&self) -> ProcessorConfig {
        ProcessorConfig::new(self.language.clone(), self.max_sessions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_populate_derived_configs() {
        let config = ServerConfig::try_parse_from([
            "imgtext-server",
            "--host",
            "127.0.0.1",
            "--port",
            "8080",
            "--language",
            "deu",
            "--psm",
            "6",
            "--max-sessions",
            "4",
            "--upload-dir",
            "/var/tmp/uploads",
        ])
        .unwrap();

        assert_eq!(config.socket_addr(), "127.0.0.1:8080".parse().unwrap());
        assert_eq!(config.processor_config().language, "deu");
        assert_eq!(config.processor_config().max_sessions, 4);
        assert_eq!(config.ocr_config().psm, Some(6));
        assert_eq!(config.upload_dir(), PathBuf::from("/var/tmp/uploads"));
    }

    #[test]
    fn test_public_url_falls_back_to_localhost() {
        let config = ServerConfig::try_parse_from(["imgtext-server", "--port", "4000"]).unwrap();
        if config.public_url.is_none() {
            assert_eq!(config.public_url(), "http://localhost:4000");
        }

        let config = ServerConfig::try_parse_from([
            "imgtext-server",
            "--public-url",
            "https://ocr.example.com",
        ])
        .unwrap();
        assert_eq!(config.public_url(), "https://ocr.example.com");
    }

    #[test]
    fn test_host_must_be_an_ip_address() {
        assert!(ServerConfig::try_parse_from(["imgtext-server", "--host", "localhost"]).is_err());

        let config = ServerConfig::try_parse_from(["imgtext-server", "--host", "::1"]).unwrap();
        assert_eq!(config.host, "::1".parse::<IpAddr>().unwrap());
    }

    #[test]
    fn test_invalid_port_is_rejected() {
        assert!(ServerConfig::try_parse_from(["imgtext-server", "--port", "not-a-port"]).is_err());
    }
}
