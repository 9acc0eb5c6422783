use crate::accounts::entity::Account;

/// Rendered email, independent of the provider that delivers it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailMessage {
    pub to: String,
    pub subject: String,
    pub text: String,
    pub html: String,
}

impl EmailMessage {
    pub fn account_created(account: &Account) -> Self {
        let name = account.full_name();
        Self {
            to: account.email.clone(),
            subject: "Welcome to our application".into(),
            text: format!("Hello {name}, thanks for signing up to our application!"),
            html: format!(
                "<p>Hello <strong>{}</strong>, thanks for signing up to our application!</p>",
                escape_html(&name)
            ),
        }
    }

    pub fn account_updated(account: &Account) -> Self {
        let name = account.full_name();
        Self {
            to: account.email.clone(),
            subject: "Your profile has been updated".into(),
            text: format!("Hello {name}, your profile has been updated successfully."),
            html: format!(
                "<p>Hello <strong>{}</strong>, your profile has been updated successfully.</p>",
                escape_html(&name)
            ),
        }
    }
}

fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accounts::entity::NewAccount;
    use time::OffsetDateTime;

    fn account(first: &str) -> Account {
        NewAccount {
            id: None,
            email: "ada@x.com".into(),
            password_hash: "h".into(),
            first_name: first.into(),
            last_name: "Lovelace".into(),
        }
        .into_account(OffsetDateTime::now_utc())
    }

    #[test]
    fn created_message_greets_full_name() {
        let msg = EmailMessage::account_created(&account("Ada"));
        assert_eq!(msg.to, "ada@x.com");
        assert!(msg.text.contains("Ada Lovelace"));
        assert!(msg.html.contains("<strong>Ada Lovelace</strong>"));
    }

    #[test]
    fn html_body_escapes_names() {
        let msg = EmailMessage::account_updated(&account("<script>"));
        assert!(msg.html.contains("&lt;script&gt; Lovelace"));
        assert!(!msg.html.contains("<script>"));
        assert!(msg.text.contains("<script> Lovelace"));
    }
}
