use crate::app::Console;
use crate::errors::AppResult;
use crate::models::message::{Message, SendMessageRequest};

impl Console {
    /// Possible message recipients.
    pub async fn usernames(&self) -> AppResult<Vec<String>> {
        self.fetch("users/usernames").await
    }

    pub async fn send_message(&self, receiver_user_name: &str, text: &str) -> AppResult<()> {
        let request = SendMessageRequest {
            receiver_user_name: receiver_user_name.trim().to_string(),
            text: text.to_string(),
        };
        request.validate()?;
        self.submit("messages/create", &request).await
    }

    /// Messages the current user sent or received.
    pub async fn my_messages(&self) -> AppResult<Vec<Message>> {
        self.fetch("messages/mine").await
    }

    pub async fn all_messages(&self) -> AppResult<Vec<Message>> {
        self.fetch("messages").await
    }
}
