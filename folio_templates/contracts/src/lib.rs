use folio_models::contact::ContactSubmission;
use serde::Serialize;

pub trait TemplateService: Send + Sync + 'static {
    /// Render the given template.
    fn render<T: Template + 'static>(&self, template: &T) -> anyhow::Result<String>;
}

pub trait Template: Serialize {
    const NAME: &'static str;
    const TEMPLATE: &'static str;
}

macro_rules! templates {
    ($( $ident:ident ( $path:literal ), )* ) => {
        $(
            impl Template for $ident {
                const NAME: &'static str = stringify!($ident);
                const TEMPLATE: &'static str = include_str!(concat!("../templates/", $path));
            }
        )*

        pub const TEMPLATES: &[(&str, &str)] = &[
            $( ($ident::NAME, $ident::TEMPLATE) ),*
        ];
    };
}

templates! {
    ContactNotificationTemplate("contact_notification.html"),
}

/// Body of the email the site owner receives for a contact form submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContactNotificationTemplate {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub budget: Option<String>,
    pub message: String,
}

impl From<&ContactSubmission> for ContactNotificationTemplate {
    fn from(submission: &ContactSubmission) -> Self {
        Self {
            name: (*submission.name).clone(),
            email: submission.email.as_str().into(),
            subject: (*submission.subject).clone(),
            budget: submission.budget.as_ref().map(|budget| (**budget).clone()),
            message: (*submission.message).clone(),
        }
    }
}
