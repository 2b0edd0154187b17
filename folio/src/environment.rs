//! Wiring of the services used by the REST server.

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};

use folio_api_rest::RestServerConfig;
use folio_config::Config;
use folio_core_contact_impl::{ContactFeatureConfig, ContactServiceImpl};
use folio_email_impl::EmailServiceImpl;
use folio_templates_impl::TemplateServiceImpl;
use url::Url;

pub type Email = EmailServiceImpl;
pub type Template = TemplateServiceImpl;
pub type Contact = ContactServiceImpl<Email, Template>;
pub type RestServer = folio_api_rest::RestServer<Contact>;

/// Per-service configuration derived from the loaded [`Config`].
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub rest_server_config: RestServerConfig,
    pub contact_feature_config: ContactFeatureConfig,
}

impl ServiceConfig {
    pub fn new(config: &Config) -> Self {
        // API
        let rest_server_config = RestServerConfig {
            host: config.http.host,
            port: config.http.port,
        };

        // Core
        let contact_feature_config = ContactFeatureConfig {
            sender: config.email.from.clone().into(),
            recipient: config.contact.recipient.clone().into(),
            subject_prefix: config.contact.subject_prefix.as_str().into(),
        };

        Self {
            rest_server_config,
            contact_feature_config,
        }
    }
}

pub fn rest_server(config: ServiceConfig, email: Email) -> RestServer {
    let contact = ContactServiceImpl::new(
        email,
        TemplateServiceImpl::default(),
        config.contact_feature_config,
    );
    RestServer::new(config.rest_server_config, contact)
}

/// Url of the contact route of a server listening on `host:port`.
pub fn contact_endpoint(host: IpAddr, port: u16) -> anyhow::Result<Url> {
    let host = match host {
        IpAddr::V4(host) if host.is_unspecified() => Ipv4Addr::LOCALHOST.into(),
        IpAddr::V6(host) if host.is_unspecified() => Ipv6Addr::LOCALHOST.into(),
        host => host,
    };
    format!("http://{}/api/contact", SocketAddr::new(host, port))
        .parse()
        .map_err(Into::into)
}
