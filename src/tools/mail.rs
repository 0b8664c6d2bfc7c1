use crate::api::messages::{self, SendEmailInput};
use crate::api::GraphRequest;
use crate::envelope::{Envelope, SendOutcome, Status};
use crate::error::AppResult;

use super::Outlook;

impl Outlook {
    /// Sends each message with its own request. A failed message is recorded
    /// and the remaining messages are still sent.
    pub async fn send_messages(&self, connection_id: Option<&str>, inputs: &[SendEmailInput]) -> AppResult<Vec<SendOutcome>> {
        let token = self.access_token(connection_id).await?;
        let mut outcomes = Vec::with_capacity(inputs.len());

        for input in inputs {
            let recipients = input.message.to_recipients.clone();
            let outcome = match messages::send_payload(input) {
                Ok(payload) => self
                    .graph()
                    .execute(
                        &token,
                        GraphRequest::post(messages::send_mail_endpoint(), payload).accept(&[202]),
                    )
                    .await
                    .map(|_| ()),
                Err(err) => Err(err),
            };

            if let Err(err) = &outcome {
                tracing::warn!(recipients = ?recipients, error = %err, "message send failed");
            }
            outcomes.push(SendOutcome::from_result(recipients, outcome));
        }

        let sent = outcomes
            .iter()
            .filter(|outcome| outcome.status == Status::Success)
            .count();
        tracing::info!(sent, total = outcomes.len(), "sent messages");
        Ok(outcomes)
    }
}

pub async fn send_email(outlook: &Outlook, connection_id: Option<&str>, input: SendEmailInput) -> Envelope<Vec<SendOutcome>> {
    send_emails(outlook, connection_id, vec![input]).await
}

pub async fn send_emails(
    outlook: &Outlook,
    connection_id: Option<&str>,
    inputs: Vec<SendEmailInput>,
) -> Envelope<Vec<SendOutcome>> {
    Envelope::finish("send_emails", outlook.send_messages(connection_id, &inputs).await)
}
