use std::net::IpAddr;

use axum::Router;
use folio_core_contact_contracts::ContactService;
use tokio::net::TcpListener;
use tracing::info;

mod middlewares;
mod models;
mod routes;

#[derive(Debug, Clone)]
pub struct RestServer<Contact> {
    config: RestServerConfig,
    contact: Contact,
}

#[derive(Debug, Clone)]
pub struct RestServerConfig {
    pub host: IpAddr,
    pub port: u16,
}

impl<Contact> RestServer<Contact>
where
    Contact: ContactService,
{
    pub fn new(config: RestServerConfig, contact: Contact) -> Self {
        Self { config, contact }
    }

    pub async fn serve(self) -> anyhow::Result<()> {
        let RestServerConfig { host, port } = self.config;
        let listener = TcpListener::bind((host, port)).await?;
        info!("Listening on {}", listener.local_addr()?);
        self.serve_on(listener).await
    }

    /// Serve on an already bound listener.
    pub async fn serve_on(self, listener: TcpListener) -> anyhow::Result<()> {
        axum::serve(listener, self.router())
            .await
            .map_err(Into::into)
    }

    pub fn router(self) -> Router<()> {
        let router = Router::new().merge(routes::contact::router(self.contact.into()));

        let router = middlewares::panic_handler::add(router);
        let router = middlewares::trace::add(router);
        middlewares::request_id::add(router)
    }
}

#[cfg(test)]
mod tests {
    use std::net::Ipv4Addr;

    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use folio_core_contact_contracts::MockContactService;
    use tower::ServiceExt;

    use super::*;

    fn make_sut(contact: MockContactService) -> Router<()> {
        let config = RestServerConfig {
            host: Ipv4Addr::LOCALHOST.into(),
            port: 0,
        };
        RestServer::new(config, contact).router()
    }

    #[tokio::test]
    async fn request_id_header() {
        let contact = MockContactService::new().with_submit(Default::default(), Ok(()));

        let response = make_sut(contact)
            .oneshot(Request::post("/api/contact").body(Body::from("{}")).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let request_id = response.headers().get("x-request-id").unwrap();
        assert_eq!(request_id.len(), 22);
    }

    #[tokio::test]
    async fn request_id_from_caller_is_kept() {
        let contact = MockContactService::new().with_submit(Default::default(), Ok(()));

        let response = make_sut(contact)
            .oneshot(
                Request::post("/api/contact")
                    .header("x-request-id", "edge-1234")
                    .body(Body::from("{}"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.headers()["x-request-id"], "edge-1234");
    }

    #[tokio::test]
    async fn panic_is_internal_server_error() {
        let mut contact = MockContactService::new();
        contact
            .expect_submit()
            .returning(|_| panic!("contact service exploded"));

        let response = make_sut(contact)
            .oneshot(Request::post("/api/contact").body(Body::from("{}")).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(response.headers().contains_key("x-request-id"));
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&body[..], br#"{"message":"Internal server error"}"#);
    }

    #[tokio::test]
    async fn unknown_route() {
        let response = make_sut(MockContactService::new())
            .oneshot(Request::get("/api/other").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
