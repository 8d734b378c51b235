use crate::api::{ContactResponse, CreateContactRequest, UpdateContactRequest};
use leptos::*;

#[derive(Clone, Copy)]
pub struct ContactFormState {
    pub name: RwSignal<String>,
    pub phone: RwSignal<String>,
    pub email: RwSignal<String>,
    pub is_emergency: RwSignal<bool>,
    /// `Some` while editing an existing contact.
    pub editing_id: RwSignal<Option<String>>,
}

impl Default for ContactFormState {
    fn default() -> Self {
        Self {
            name: create_rw_signal(String::new()),
            phone: create_rw_signal(String::new()),
            email: create_rw_signal(String::new()),
            is_emergency: create_rw_signal(false),
            editing_id: create_rw_signal(None),
        }
    }
}

impl ContactFormState {
    pub fn reset(&self) {
        self.name.set(String::new());
        self.phone.set(String::new());
        self.email.set(String::new());
        self.is_emergency.set(false);
        self.editing_id.set(None);
    }

    pub fn load(&self, contact: &ContactResponse) {
        self.name.set(contact.name.clone());
        self.phone.set(contact.phone.clone().unwrap_or_default());
        self.email.set(contact.email.clone().unwrap_or_default());
        self.is_emergency.set(contact.is_emergency);
        self.editing_id.set(Some(contact.id.clone()));
    }

    pub fn to_create_request(&self) -> CreateContactRequest {
        CreateContactRequest {
            name: self.name.get_untracked().trim().to_string(),
            phone: optional(&self.phone.get_untracked()),
            email: optional(&self.email.get_untracked()),
            is_emergency: self.is_emergency.get_untracked(),
        }
    }

    pub fn to_update_request(&self) -> UpdateContactRequest {
        UpdateContactRequest {
            name: Some(self.name.get_untracked().trim().to_string()),
            phone: Some(self.phone.get_untracked().trim().to_string()),
            email: Some(self.email.get_untracked().trim().to_string()),
            is_emergency: Some(self.is_emergency.get_untracked()),
        }
    }
}

fn optional(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

pub fn validate_contact_form(name: &str, phone: &str, email: &str) -> Result<(), String> {
    if name.trim().is_empty() {
        return Err("Name is required".to_string());
    }
    if phone.trim().is_empty() && email.trim().is_empty() {
        return Err("Provide a phone number or an email address".to_string());
    }
    if !email.trim().is_empty() && !email.contains('@') {
        return Err("Enter a valid email address".to_string());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contact_needs_a_name_and_one_reachable_channel() {
        assert!(validate_contact_form("Alice", "+49151", "").is_ok());
        assert!(validate_contact_form("Alice", "", "alice@example.com").is_ok());
        assert!(validate_contact_form("", "+49151", "").is_err());
        assert!(validate_contact_form("Alice", "", "").is_err());
        assert!(validate_contact_form("Alice", "", "not-an-email").is_err());
    }
}
