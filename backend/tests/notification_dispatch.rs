use std::sync::{Arc, Mutex};

use haven_backend::handlers::notifications::contact_field_errors;
use haven_backend::models::live_session::TriggerSource;
use haven_backend::models::notification::{NotifyContact, SosNotificationResponse};
use haven_backend::services::notifier::{AlertMessage, NotificationChannel, Notifier};

mockall::mock! {
    Channel {}

    #[async_trait::async_trait]
    impl NotificationChannel for Channel {
        async fn send(&self, contact: &NotifyContact, message: &AlertMessage) -> anyhow::Result<()>;
    }
}

fn contact(name: &str, email: Option<&str>, phone: Option<&str>) -> NotifyContact {
    NotifyContact {
        name: name.to_string(),
        email: email.map(str::to_string),
        phone: phone.map(str::to_string),
    }
}

fn tokens(n: usize) -> Vec<String> {
    (0..n).map(|i| format!("token-{}", i)).collect()
}

const BASE_URL: &str = "https://haven.example";

#[tokio::test]
async fn every_contact_gets_one_attempt_per_reachable_channel() {
    let contacts = vec![
        contact("Gran", Some("gran@example.com"), Some("+27821234567")),
        contact("Sipho", Some("sipho@example.com"), Some("+27829876543")),
    ];

    let mut email = MockChannel::new();
    email.expect_send().times(2).returning(|_, _| Ok(()));
    let mut whatsapp = MockChannel::new();
    whatsapp.expect_send().times(2).returning(|_, _| Ok(()));

    let notifier = Notifier::new(Arc::new(email), Some(Arc::new(whatsapp)));
    let results = notifier
        .dispatch(&contacts, &tokens(2), "Thandi", TriggerSource::Sos, BASE_URL)
        .await;

    let response = SosNotificationResponse::from_results(results);
    assert!(response.success);
    assert_eq!(response.total, 2);
    assert_eq!(response.sent.email, 2);
    assert_eq!(response.sent.whatsapp, 2);
}

#[tokio::test]
async fn one_failed_send_never_blocks_the_rest() {
    let contacts = vec![
        contact("Gran", Some("gran@example.com"), None),
        contact("Sipho", Some("sipho@example.com"), None),
    ];

    let mut email = MockChannel::new();
    email.expect_send().times(2).returning(|contact, _| {
        if contact.name == "Gran" {
            Err(anyhow::anyhow!("mailbox unavailable"))
        } else {
            Ok(())
        }
    });

    let notifier = Notifier::new(Arc::new(email), None);
    let results = notifier
        .dispatch(&contacts, &tokens(2), "Thandi", TriggerSource::Sos, BASE_URL)
        .await;

    assert_eq!(results.len(), 2);
    let gran = results.iter().find(|r| r.contact == "Gran").unwrap();
    assert!(!gran.email.as_ref().unwrap().success);
    let sipho = results.iter().find(|r| r.contact == "Sipho").unwrap();
    assert!(sipho.email.as_ref().unwrap().success);

    let response = SosNotificationResponse::from_results(results);
    assert!(response.success);
    assert_eq!(response.sent.email, 1);
}

#[tokio::test]
async fn contacts_without_a_phone_skip_whatsapp() {
    let contacts = vec![
        contact("Gran", Some("gran@example.com"), None),
        contact("Sipho", Some("sipho@example.com"), Some("+27829876543")),
    ];

    let mut email = MockChannel::new();
    email.expect_send().times(2).returning(|_, _| Ok(()));
    let mut whatsapp = MockChannel::new();
    whatsapp.expect_send().times(1).returning(|_, _| Ok(()));

    let notifier = Notifier::new(Arc::new(email), Some(Arc::new(whatsapp)));
    let results = notifier
        .dispatch(&contacts, &tokens(2), "Thandi", TriggerSource::Sos, BASE_URL)
        .await;

    let gran = results.iter().find(|r| r.contact == "Gran").unwrap();
    assert!(gran.whatsapp.is_none());
    let sipho = results.iter().find(|r| r.contact == "Sipho").unwrap();
    assert!(sipho.whatsapp.as_ref().unwrap().success);
}

#[tokio::test]
async fn unconfigured_whatsapp_channel_records_no_attempts() {
    let contacts = vec![contact("Gran", Some("gran@example.com"), Some("+27821234567"))];

    let mut email = MockChannel::new();
    email.expect_send().times(1).returning(|_, _| Ok(()));

    let notifier = Notifier::new(Arc::new(email), None);
    let results = notifier
        .dispatch(&contacts, &tokens(1), "Thandi", TriggerSource::Sos, BASE_URL)
        .await;

    assert!(results[0].whatsapp.is_none());
    let response = SosNotificationResponse::from_results(results);
    assert_eq!(response.sent.whatsapp, 0);
}

#[tokio::test]
async fn tracking_links_pair_contacts_with_tokens_round_robin() {
    let contacts = vec![
        contact("A", Some("a@example.com"), None),
        contact("B", Some("b@example.com"), None),
        contact("C", Some("c@example.com"), None),
    ];

    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    let mut email = MockChannel::new();
    email.expect_send().times(3).returning(move |_, message| {
        sink.lock().unwrap().push(message.tracking_link.clone());
        Ok(())
    });

    let notifier = Notifier::new(Arc::new(email), None);
    notifier
        .dispatch(&contacts, &tokens(2), "Thandi", TriggerSource::Manual, BASE_URL)
        .await;

    let links = seen.lock().unwrap().clone();
    assert_eq!(
        links,
        vec![
            format!("{}/track/token-0", BASE_URL),
            format!("{}/track/token-1", BASE_URL),
            format!("{}/track/token-0", BASE_URL),
        ]
    );
}

#[tokio::test]
async fn one_malformed_contact_rejects_the_whole_batch_before_any_send() {
    let contacts = vec![
        contact("Gran", Some("gran@example.com"), None),
        contact("Sipho", Some("not-an-address"), None),
    ];

    let mut email = MockChannel::new();
    email.expect_send().times(0);
    let notifier = Notifier::new(Arc::new(email), None);

    // The handler runs the same gate ahead of dispatch; a single malformed
    // address means the valid sibling gets nothing either.
    let errors = contact_field_errors(&contacts);
    if errors.is_empty() {
        notifier
            .dispatch(&contacts, &tokens(2), "Thandi", TriggerSource::Sos, BASE_URL)
            .await;
    }
    assert_eq!(errors, vec!["Sipho: invalid email address".to_string()]);
}

#[tokio::test]
async fn contact_names_are_sanitized_before_templating_and_echo() {
    let contacts = vec![contact(
        "<script>x</script>",
        Some("gran@example.com"),
        None,
    )];

    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    let mut email = MockChannel::new();
    email.expect_send().times(1).returning(move |_, message| {
        sink.lock().unwrap().push(message.body());
        Ok(())
    });

    let notifier = Notifier::new(Arc::new(email), None);
    let results = notifier
        .dispatch(&contacts, &tokens(1), "Thandi", TriggerSource::Sos, BASE_URL)
        .await;

    let body = seen.lock().unwrap()[0].clone();
    assert!(!body.contains('<') && !body.contains('>'));
    assert!(body.contains("Hi scriptx/script,"));
    assert_eq!(results[0].contact, "scriptx/script");
}
