use crate::helpers::{rey_palpatine, rey_palpatine_payload, spawn_app};
use reqwest::Method;
use sqlx::Row;
use subscribers_api::models::{Subscriber, SubscriberGateway};
use subscribers_api::utils::ResponseErrorMessage;

const REY_QUERY: &str =
    "?email_address=riseofskywalker@starwars.com&last_name=Palpatine&first_name=Rey";

#[tokio::test]
async fn post_with_query_string_returns_201_and_the_created_subscriber() {
    // Arrange
    let app = spawn_app().await;

    // Act
    let response = app
        .post_subscribers(REY_QUERY, Some(&rey_palpatine_payload()))
        .await;

    // Assert
    assert_eq!(201, response.status().as_u16());

    let subscriber: Subscriber = response.json().await.unwrap();
    assert_eq!(subscriber.email_address, "riseofskywalker@starwars.com");
    assert_eq!(subscriber.first_name, "Rey");
    assert_eq!(subscriber.last_name, "Palpatine");
    assert!(!subscriber.activation_flag);
    assert!(subscriber.id > 0);
    assert_eq!(subscriber.created_at, subscriber.updated_at);
}

#[tokio::test]
async fn post_persists_the_new_subscriber() {
    // Arrange
    let app = spawn_app().await;

    // Act
    app.post_subscribers(REY_QUERY, Some(&rey_palpatine_payload()))
        .await;

    // Assert
    let saved = sqlx::query(
        "SELECT email_address, first_name, last_name, activation_flag FROM subscribers",
    )
    .fetch_one(&app.db_pool)
    .await
    .expect("Failed to fetch saved subscriber.");

    assert_eq!(
        saved.get::<String, _>("email_address"),
        "riseofskywalker@starwars.com"
    );
    assert_eq!(saved.get::<String, _>("first_name"), "Rey");
    assert_eq!(saved.get::<String, _>("last_name"), "Palpatine");
    assert!(!saved.get::<bool, _>("activation_flag"));
}

#[tokio::test]
async fn post_reads_fields_from_the_query_string_when_there_is_no_body() {
    let app = spawn_app().await;

    let response = app
        .post_subscribers(&format!("{}&activation_flag=1", REY_QUERY), None)
        .await;

    assert_eq!(201, response.status().as_u16());

    let subscriber: Subscriber = response.json().await.unwrap();
    assert_eq!(subscriber.email_address, "riseofskywalker@starwars.com");
    assert_eq!(subscriber.first_name, "Rey");
    assert_eq!(subscriber.last_name, "Palpatine");
    assert!(subscriber.activation_flag);
}

#[tokio::test]
async fn post_prefers_body_fields_over_query_fields() {
    let app = spawn_app().await;

    let response = app
        .post_subscribers(
            "?last_name=Palpatine",
            Some(&serde_json::json!({"last_name": "Skywalker", "first_name": "Rey"})),
        )
        .await;

    assert_eq!(201, response.status().as_u16());

    let subscriber: Subscriber = response.json().await.unwrap();
    assert_eq!(subscriber.last_name, "Skywalker");
    assert_eq!(subscriber.first_name, "Rey");
}

#[tokio::test]
async fn post_with_partial_fields_stores_defaults() {
    let app = spawn_app().await;

    let response = app.post_subscribers("?first_name=Rey", None).await;

    assert_eq!(201, response.status().as_u16());

    let subscriber: Subscriber = response.json().await.unwrap();
    assert_eq!(subscriber.first_name, "Rey");
    assert_eq!(subscriber.email_address, "");
    assert_eq!(subscriber.last_name, "");
    assert!(!subscriber.activation_flag);
}

#[tokio::test]
async fn post_without_query_string_returns_405_and_stores_nothing() {
    let app = spawn_app().await;
    let test_cases = vec![
        (Some(rey_palpatine_payload()), "with payload"),
        (None, "without payload"),
    ];

    for (body, description) in test_cases {
        let response = app.post_subscribers("/", body.as_ref()).await;

        assert_eq!(
            405,
            response.status().as_u16(),
            "The API did not fail with 405 Method Not Allowed when the request was sent {}.",
            description
        );
        let response_body: ResponseErrorMessage = response.json().await.unwrap();
        assert_eq!(
            response_body.error,
            "HTTP command POST without query parameters is not allowed. Please provide an acceptable HTTP command."
        );
    }

    let count: i64 = sqlx::query("SELECT COUNT(*) AS count FROM subscribers")
        .fetch_one(&app.db_pool)
        .await
        .unwrap()
        .get("count");
    assert_eq!(count, 0);
}

#[tokio::test]
async fn post_with_an_id_returns_405() {
    let app = spawn_app().await;

    let response = app
        .send(
            Method::POST,
            &format!("/api/subscribers/1{}", REY_QUERY),
            Some(&rey_palpatine_payload()),
        )
        .await;

    assert_eq!(405, response.status().as_u16());
}

#[tokio::test]
async fn post_with_an_uninterpretable_activation_flag_returns_500() {
    let app = spawn_app().await;

    let response = app
        .post_subscribers("?activation_flag=maybe", None)
        .await;

    assert_eq!(500, response.status().as_u16());
    let response_body: ResponseErrorMessage = response.json().await.unwrap();
    assert_eq!(
        response_body.error,
        "Error caused by server or client. Please provide acceptable API Command."
    );
}

#[tokio::test]
async fn get_returns_the_stored_subscriber() {
    let app = spawn_app().await;
    let stored = app.store_rey().await;

    let response = app.get_subscriber(stored.id).await;

    assert_eq!(200, response.status().as_u16());
    let subscriber: Subscriber = response.json().await.unwrap();
    assert_eq!(subscriber, stored);
}

#[tokio::test]
async fn get_nonexistent_subscriber_returns_404() {
    let app = spawn_app().await;

    let response = app.get_subscriber(4000).await;

    assert_eq!(404, response.status().as_u16());
    let response_body: ResponseErrorMessage = response.json().await.unwrap();
    assert_eq!(
        response_body.error,
        "The records or resources that you requested are not available."
    );
}

#[tokio::test]
async fn list_without_subscribers_returns_204_with_an_empty_body() {
    let app = spawn_app().await;

    let response = app.get_subscribers().await;

    assert_eq!(204, response.status().as_u16());
    assert_eq!(response.text().await.unwrap(), "");
}

#[tokio::test]
async fn list_returns_every_subscriber_ordered_by_id() {
    let app = spawn_app().await;
    let mut stored = vec![app.store_rey().await];
    for _ in 0..4 {
        stored.push(app.store_fake_subscriber().await);
    }

    let response = app.get_subscribers().await;

    assert_eq!(200, response.status().as_u16());
    let subscribers: Vec<Subscriber> = response.json().await.unwrap();
    assert_eq!(subscribers, stored);
}

#[tokio::test]
async fn put_and_patch_update_only_the_supplied_fields() {
    let app = spawn_app().await;

    for method in [Method::PUT, Method::PATCH] {
        let stored = app.store_rey().await;
        let payload = serde_json::json!({"last_name": "Skywalker"});

        let response = app
            .update_subscriber(
                method.clone(),
                stored.id,
                "?last_name=Skywalker",
                Some(&payload),
            )
            .await;

        assert_eq!(
            200,
            response.status().as_u16(),
            "{} did not succeed.",
            method
        );
        let updated: Subscriber = response.json().await.unwrap();
        assert_eq!(updated.id, stored.id);
        assert_eq!(updated.email_address, "riseofskywalker@starwars.com");
        assert_eq!(updated.first_name, "Rey");
        assert_eq!(updated.last_name, "Skywalker");
        assert!(!updated.activation_flag);
        assert_eq!(updated.created_at, stored.created_at);
        assert!(updated.updated_at > stored.updated_at);

        let fetched: Subscriber = app.get_subscriber(stored.id).await.json().await.unwrap();
        assert_eq!(fetched, updated);
    }
}

#[tokio::test]
async fn put_and_patch_without_query_string_return_405_and_leave_the_record_unchanged() {
    let app = spawn_app().await;
    let stored = app.store_rey().await;
    let payload = serde_json::json!({"last_name": "Skywalker"});

    for method in [Method::PUT, Method::PATCH] {
        let response = app
            .update_subscriber(method.clone(), stored.id, "", Some(&payload))
            .await;

        assert_eq!(
            405,
            response.status().as_u16(),
            "{} without query string was accepted.",
            method
        );
        let response_body: ResponseErrorMessage = response.json().await.unwrap();
        assert_eq!(
            response_body.error,
            "HTTP command PUT/PATCH without query parameters is not allowed. Please provide an acceptable HTTP command."
        );
    }

    let fetched: Subscriber = app.get_subscriber(stored.id).await.json().await.unwrap();
    assert_eq!(fetched, stored);
}

#[tokio::test]
async fn put_and_patch_without_an_id_return_405() {
    let app = spawn_app().await;

    for method in [Method::PUT, Method::PATCH] {
        let response = app
            .send(
                method,
                "/api/subscribers/?last_name=Skywalker",
                Some(&rey_palpatine_payload()),
            )
            .await;

        assert_eq!(405, response.status().as_u16());
    }
}

#[tokio::test]
async fn updating_a_nonexistent_subscriber_returns_404() {
    let app = spawn_app().await;

    let response = app
        .update_subscriber(Method::PUT, 4000, "?last_name=Skywalker", None)
        .await;

    assert_eq!(404, response.status().as_u16());
    let response_body: ResponseErrorMessage = response.json().await.unwrap();
    assert_eq!(
        response_body.error,
        "The records or resources that you requested are not available."
    );
}

#[tokio::test]
async fn delete_returns_204_and_the_subscriber_is_gone() {
    let app = spawn_app().await;
    let stored = app.store_rey().await;

    let response = app.delete_subscriber(stored.id).await;

    assert_eq!(204, response.status().as_u16());
    assert_eq!(response.text().await.unwrap(), "");
    assert_eq!(404, app.get_subscriber(stored.id).await.status().as_u16());
}

#[tokio::test]
async fn delete_nonexistent_subscriber_returns_404() {
    let app = spawn_app().await;

    let response = app.delete_subscriber(4000).await;

    assert_eq!(404, response.status().as_u16());
}

#[tokio::test]
async fn delete_without_an_id_returns_405() {
    let app = spawn_app().await;
    app.store_rey().await;

    let response = app.send(Method::DELETE, "/api/subscribers/", None).await;

    assert_eq!(405, response.status().as_u16());
    assert_eq!(200, app.get_subscribers().await.status().as_u16());
}

#[tokio::test]
async fn ids_are_not_reused_after_deletion() {
    let app = spawn_app().await;
    let first = app.store_rey().await;
    app.delete_subscriber(first.id).await;

    let response = app
        .post_subscribers(REY_QUERY, Some(&rey_palpatine_payload()))
        .await;

    let second: Subscriber = response.json().await.unwrap();
    assert!(second.id > first.id);
}

#[tokio::test]
async fn fatal_database_error_returns_500_with_a_generic_message() {
    let app = spawn_app().await;
    app.store_rey().await;

    // Sabotage the database
    sqlx::query("ALTER TABLE subscribers DROP COLUMN email_address;")
        .execute(&app.db_pool)
        .await
        .unwrap();

    let response = app.get_subscribers().await;

    assert_eq!(500, response.status().as_u16());
    let response_body: ResponseErrorMessage = response.json().await.unwrap();
    assert_eq!(
        response_body.error,
        "Error caused by server or client. Please provide acceptable API Command."
    );
}

#[tokio::test]
async fn post_reads_fields_from_a_form_body() {
    let app = spawn_app().await;

    let response = app
        .send_form(
            Method::POST,
            "/api/subscribers?x=1",
            &[
                ("email_address", "riseofskywalker@starwars.com"),
                ("first_name", "Rey"),
                ("last_name", "Skywalker"),
                ("activation_flag", "1"),
            ],
        )
        .await;

    assert_eq!(201, response.status().as_u16());
    let subscriber: Subscriber = response.json().await.unwrap();
    assert_eq!(subscriber.email_address, "riseofskywalker@starwars.com");
    assert_eq!(subscriber.first_name, "Rey");
    assert_eq!(subscriber.last_name, "Skywalker");
    assert!(subscriber.activation_flag);
}

#[tokio::test]
async fn put_reads_fields_from_a_form_body() {
    let app = spawn_app().await;
    let stored = app.store_rey().await;

    let response = app
        .send_form(
            Method::PUT,
            &format!("/api/subscribers/{}?last_name=Palpatine", stored.id),
            &[("last_name", "Skywalker")],
        )
        .await;

    assert_eq!(200, response.status().as_u16());
    let updated: Subscriber = response.json().await.unwrap();
    assert_eq!(updated.last_name, "Skywalker");
    assert_eq!(updated.first_name, "Rey");
}

#[tokio::test]
async fn repeated_query_keys_keep_the_last_value() {
    let app = spawn_app().await;

    let response = app
        .post_subscribers("?first_name=Ben&first_name=Rey", None)
        .await;

    assert_eq!(201, response.status().as_u16());
    let subscriber: Subscriber = response.json().await.unwrap();
    assert_eq!(subscriber.first_name, "Rey");
}

#[tokio::test]
async fn json_nulls_leave_fields_untouched_on_update() {
    let app = spawn_app().await;
    let stored = app.store_rey().await;
    let payload = serde_json::json!({
        "first_name": null,
        "activation_flag": null,
        "last_name": "Skywalker"
    });

    let response = app
        .update_subscriber(Method::PATCH, stored.id, "?last_name=Skywalker", Some(&payload))
        .await;

    assert_eq!(200, response.status().as_u16());
    let updated: Subscriber = response.json().await.unwrap();
    assert_eq!(updated.first_name, "Rey");
    assert_eq!(updated.last_name, "Skywalker");
    assert!(!updated.activation_flag);
}

#[tokio::test]
async fn clearing_all_subscribers_keeps_ids_increasing() {
    let app = spawn_app().await;
    let gateway = SubscriberGateway::new(&app.db_pool);
    app.store_rey().await;
    let last = app.store_fake_subscriber().await;

    let removed = gateway.delete_all().await.unwrap();

    assert_eq!(removed, 2);
    assert_eq!(204, app.get_subscribers().await.status().as_u16());

    let next = gateway.insert(rey_palpatine()).await.unwrap();
    assert!(next.id > last.id);
}
