mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::Value;

use listkeep_api::config::OwnershipPolicy;

#[tokio::test]
async fn toggling_flips_the_stored_flag_and_summary() -> Result<()> {
    let server = common::TestServer::spawn().await?;
    let (alice, token) = server.user("u1", "alice@example.com").await?;
    let list_id = server.create_list(&token, &alice, "Groceries").await?;
    let milk = server.add_item(&token, &list_id, "Milk").await?;
    server.add_item(&token, &list_id, "Eggs").await?;
    let path = format!("/lists/{}", list_id);

    let res = server
        .submit(&path, &token, &[("action", "toggleComplete"), ("itemId", milk.as_str()), ("completed", "false")])
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body = res.json::<Value>().await?;
    assert_eq!(body["data"]["item"]["completed"], true);

    let page = server.get(&path).bearer_auth(&token).send().await?.json::<Value>().await?;
    assert_eq!(page["data"]["list"]["name"], "Groceries");
    assert_eq!(page["data"]["list"]["items"].as_array().map(Vec::len), Some(2));
    assert_eq!(page["data"]["summary"]["completed"], 1);
    assert_eq!(page["data"]["summary"]["remaining"], 1);

    server
        .submit(&path, &token, &[("action", "toggleComplete"), ("itemId", milk.as_str()), ("completed", "true")])
        .await?;
    let page = server.get(&path).bearer_auth(&token).send().await?.json::<Value>().await?;
    assert_eq!(page["data"]["summary"]["completed"], 0);
    Ok(())
}

#[tokio::test]
async fn completed_must_be_a_literal_boolean() -> Result<()> {
    let server = common::TestServer::spawn().await?;
    let (alice, token) = server.user("u1", "alice@example.com").await?;
    let list_id = server.create_list(&token, &alice, "Groceries").await?;
    let milk = server.add_item(&token, &list_id, "Milk").await?;

    let res = server
        .submit(
            &format!("/lists/{}", list_id),
            &token,
            &[("action", "toggleComplete"), ("itemId", milk.as_str()), ("completed", "yes")],
        )
        .await?;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body = res.json::<Value>().await?;
    assert_eq!(body["errors"]["itemId"], Value::Null);
    assert!(body["errors"]["completed"].is_string());
    Ok(())
}

#[tokio::test]
async fn delete_item_works_with_the_delete_method() -> Result<()> {
    let server = common::TestServer::spawn().await?;
    let (alice, token) = server.user("u1", "alice@example.com").await?;
    let list_id = server.create_list(&token, &alice, "Groceries").await?;
    let milk = server.add_item(&token, &list_id, "Milk").await?;

    let res = server
        .delete(&format!("/lists/{}", list_id))
        .bearer_auth(&token)
        .header(reqwest::header::CONTENT_TYPE, common::FORM)
        .body(format!("action=deleteItem&itemId={}", milk))
        .send()
        .await?;

    assert_eq!(res.status(), StatusCode::OK);
    assert!(server.store.items_for_list(&list_id).await.is_empty());
    Ok(())
}

#[tokio::test]
async fn foreign_items_are_not_found() -> Result<()> {
    let server = common::TestServer::spawn().await?;
    let (alice, alice_token) = server.user("u1", "alice@example.com").await?;
    let (_, bob_token) = server.user("u2", "bob@example.com").await?;
    let list_id = server.create_list(&alice_token, &alice, "Groceries").await?;
    let milk = server.add_item(&alice_token, &list_id, "Milk").await?;
    let path = format!("/lists/{}", list_id);

    let attempts: [&[(&str, &str)]; 3] = [
        &[("action", "toggleComplete"), ("itemId", milk.as_str()), ("completed", "false")],
        &[("action", "deleteItem"), ("itemId", milk.as_str())],
        &[("action", "addItem"), ("name", "Intruder"), ("listId", list_id.as_str())],
    ];
    for pairs in attempts {
        let res = server.submit(&path, &bob_token, pairs).await?;
        assert_eq!(res.status(), StatusCode::NOT_FOUND, "{:?}", pairs);
    }

    let items = server.store.items_for_list(&list_id).await;
    assert_eq!(items.len(), 1);
    assert!(!items[0].completed);

    let res = server.get(&path).bearer_auth(&bob_token).send().await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn legacy_policy_redirects_foreign_list_views() -> Result<()> {
    let server = common::TestServer::spawn_with(OwnershipPolicy::Legacy).await?;
    let (alice, alice_token) = server.user("u1", "alice@example.com").await?;
    let (_, bob_token) = server.user("u2", "bob@example.com").await?;
    let list_id = server.create_list(&alice_token, &alice, "Groceries").await?;

    let res = server.get(&format!("/lists/{}", list_id)).bearer_auth(&bob_token).send().await?;
    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(res.headers()[reqwest::header::LOCATION], "/lists");
    Ok(())
}

#[tokio::test]
async fn unknown_list_is_not_found() -> Result<()> {
    let server = common::TestServer::spawn().await?;
    let (_, token) = server.user("u1", "alice@example.com").await?;

    let res = server.get("/lists/does-not-exist").bearer_auth(&token).send().await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body = res.json::<Value>().await?;
    assert_eq!(body["success"], false);
    Ok(())
}
