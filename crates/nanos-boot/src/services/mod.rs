//! # Built-in Services
//!
//! Ordinary catalog entries compiled into the binary. The container core
//! knows nothing about them beyond their descriptors and registrations.
//!
//! | Name | Class | Lazy | Serve |
//! |------|-------|------|-------|
//! | `http` | `nanos.http.NanoHttpServer` | no | no |
//! | `pmLogger` | `nanos.pm.DaoPmLogger` | yes | no |
//! | `pmInfoDAO` | `nanos.pm.PmInfoStore` | yes | yes |
//! | `logger` | `nanos.logger.NanoLogger` | yes | no |
//! | `ping` | `nanos.http.PingService` | yes | no |
//! | `uptime` | `nanos.http.UptimeService` | no | no |

mod http;
mod logger;
mod ping;
mod pm;
mod uptime;

pub use http::NanoHttpServer;
pub use logger::NanoLogger;
pub use ping::PingService;
pub use pm::{PmInfo, PmInfoStore, PmLogger};
pub use uptime::UptimeService;

use nanos_catalog::{DescriptorSource, ServiceDescriptor};

use crate::registry::ServiceRegistry;

pub const HTTP_NAME: &str = "http";
pub const PM_LOGGER_NAME: &str = "pmLogger";
pub const PM_INFO_NAME: &str = "pmInfoDAO";
pub const LOGGER_NAME: &str = "logger";
pub const PING_NAME: &str = "ping";
pub const UPTIME_NAME: &str = "uptime";

pub const HTTP_SERVER_CLASS: &str = "nanos.http.NanoHttpServer";
pub const PM_LOGGER_CLASS: &str = "nanos.pm.DaoPmLogger";
pub const PM_INFO_CLASS: &str = "nanos.pm.PmInfoStore";
pub const LOGGER_CLASS: &str = "nanos.logger.NanoLogger";
pub const PING_CLASS: &str = "nanos.http.PingService";
pub const UPTIME_CLASS: &str = "nanos.http.UptimeService";

/// The compiled-in descriptor list.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinServices;

impl DescriptorSource for BuiltinServices {
    fn descriptors(&self) -> Vec<ServiceDescriptor> {
        vec![
            ServiceDescriptor::new(HTTP_NAME, HTTP_SERVER_CLASS).with_lazy(false),
            ServiceDescriptor::new(PM_LOGGER_NAME, PM_LOGGER_CLASS),
            ServiceDescriptor::new(PM_INFO_NAME, PM_INFO_CLASS).with_serve(true),
            ServiceDescriptor::new(LOGGER_NAME, LOGGER_CLASS),
            ServiceDescriptor::new(PING_NAME, PING_CLASS),
            ServiceDescriptor::new(UPTIME_NAME, UPTIME_CLASS).with_lazy(false),
        ]
    }
}

pub(crate) fn register_builtin(registry: &mut ServiceRegistry) {
    registry
        .register(HTTP_SERVER_CLASS, |_| Ok(NanoHttpServer::new()))
        .register(PM_LOGGER_CLASS, |_| Ok(PmLogger::new()))
        .register(PM_INFO_CLASS, |_| Ok(PmInfoStore::new()))
        .register(LOGGER_CLASS, |d| Ok(NanoLogger::new(d.name())))
        .register(PING_CLASS, |_| Ok(PingService::new()))
        .register(UPTIME_CLASS, |_| Ok(UptimeService::new()));
}
