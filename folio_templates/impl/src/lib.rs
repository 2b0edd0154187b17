use std::sync::Arc;

use folio_templates_contracts::{Template, TemplateService, TEMPLATES};
use tera::Tera;

#[derive(Debug, Clone, Default)]
pub struct TemplateServiceImpl {
    state: State,
}

#[derive(Debug, Clone)]
struct State(Arc<Tera>);

impl Default for State {
    fn default() -> Self {
        let mut tera = Tera::default();

        for &(name, template) in TEMPLATES {
            tera.add_raw_template(name, template).unwrap();
        }

        Self(tera.into())
    }
}

impl TemplateService for TemplateServiceImpl {
    fn render<T: Template>(&self, template: &T) -> anyhow::Result<String> {
        let context = tera::Context::from_serialize(template)?;
        self.state.0.render(T::NAME, &context).map_err(Into::into)
    }
}

#[cfg(test)]
mod tests {
    use folio_models::contact::{validate, ContactFormDraft};
    use folio_templates_contracts::ContactNotificationTemplate;
    use pretty_assertions::assert_eq;

    use super::*;

    fn template() -> ContactNotificationTemplate {
        ContactNotificationTemplate {
            name: "Ana Lopez".into(),
            email: "ana@example.com".into(),
            subject: "Project inquiry".into(),
            budget: None,
            message: "Hi,\nI'd like to discuss a project.".into(),
        }
    }

    #[test]
    fn contact_notification() {
        // Arrange
        let sut = TemplateServiceImpl::default();

        // Act
        let result = sut.render(&template()).unwrap();

        // Assert
        assert!(result.contains("<h1>New Contact Form Submission</h1>"));
        assert!(result.contains("<p><strong>Name:</strong> Ana Lopez</p>"));
        assert!(result.contains("<p><strong>Email:</strong> ana@example.com</p>"));
        assert!(result.contains("<p><strong>Budget:</strong> Not specified</p>"));
        assert!(result.contains("<p>Hi,<br>I&#x27;d like to discuss a project.</p>"));
    }

    #[test]
    fn contact_notification_with_budget() {
        let sut = TemplateServiceImpl::default();

        let result = sut
            .render(&ContactNotificationTemplate {
                budget: Some("5k - 10k".into()),
                ..template()
            })
            .unwrap();

        assert!(result.contains("<p><strong>Budget:</strong> 5k - 10k</p>"));
    }

    #[test]
    fn contact_notification_escapes_user_input() {
        // Arrange
        let sut = TemplateServiceImpl::default();
        let template = ContactNotificationTemplate {
            name: "<script>alert(1)</script>".into(),
            subject: "Tom & Jerry".into(),
            message: "<b>bold</b>\r\nnext".into(),
            ..template()
        };

        // Act
        let result = sut.render(&template).unwrap();

        // Assert
        assert!(!result.contains("<script>"));
        assert!(!result.contains("<b>"));
        assert!(result.contains("&lt;script&gt;alert(1)&lt;"));
        assert!(result.contains("Tom &amp; Jerry"));
        assert!(result.contains("&lt;b&gt;bold&lt;"));
        assert!(result.contains("<br>next"));
    }

    #[test]
    fn template_from_submission() {
        let submission = validate(
            &(&ContactFormDraft {
                name: " Ana Lopez ".into(),
                email: "ana@example.com".into(),
                subject: "Project inquiry".into(),
                message: "Hello".into(),
                budget: "5k".into(),
                honeypot: String::new(),
            })
                .into(),
        )
        .unwrap();

        assert_eq!(
            ContactNotificationTemplate::from(&submission),
            ContactNotificationTemplate {
                name: "Ana Lopez".into(),
                email: "ana@example.com".into(),
                subject: "Project inquiry".into(),
                budget: Some("5k".into()),
                message: "Hello".into(),
            }
        );
    }
}
