use anyhow::bail;
use clap::Subcommand;
use folio_client::{ContactForm, SubmitOutcome, Toast};
use folio_config::Config;
use folio_models::contact::ContactField;
use url::Url;

use crate::environment;

#[derive(Debug, Subcommand)]
pub enum ContactCommand {
    /// Submit the contact form
    #[command(aliases(["s"]))]
    Submit {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        subject: String,
        #[arg(long)]
        message: String,
        #[arg(long)]
        budget: Option<String>,
        /// Url of the contact route [default: derived from the http config]
        #[arg(long)]
        endpoint: Option<Url>,
    },
}

impl ContactCommand {
    pub async fn invoke(self, config: Config) -> anyhow::Result<()> {
        match self {
            ContactCommand::Submit {
                name,
                email,
                subject,
                message,
                budget,
                endpoint,
            } => {
                let endpoint = match endpoint {
                    Some(endpoint) => endpoint,
                    None => environment::contact_endpoint(config.http.host, config.http.port)?,
                };

                let form = ContactForm::new(endpoint)?;
                form.set_field(ContactField::Name, name);
                form.set_field(ContactField::Email, email);
                form.set_field(ContactField::Subject, subject);
                form.set_field(ContactField::Message, message);
                if let Some(budget) = budget {
                    form.set_field(ContactField::Budget, budget);
                }

                submit(&form).await
            }
        }
    }
}

async fn submit(form: &ContactForm) -> anyhow::Result<()> {
    match form.submit().await {
        SubmitOutcome::Toast(Toast::Success(message)) => {
            println!("{message}");
            Ok(())
        }
        SubmitOutcome::Toast(Toast::Error(message)) => {
            print_errors(form);
            bail!(message)
        }
        SubmitOutcome::Invalid => {
            print_errors(form);
            bail!("The contact form is invalid")
        }
        SubmitOutcome::Busy => bail!("Another submission is still in progress"),
    }
}

fn print_errors(form: &ContactForm) {
    for (field, messages) in form.errors().iter() {
        for message in messages {
            eprintln!("{field}: {message}");
        }
    }
}
