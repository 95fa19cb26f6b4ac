mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::json;

// Outside the range of real ISBN-13 prefixes so runs never collide with catalogue data
const ISBN: i64 = 9990000000017;

#[tokio::test]
async fn add_rate_and_delete_a_book() -> Result<()> {
    let Some(server) = common::ensure_server().await? else {
        return Ok(());
    };
    let client = reqwest::Client::new();
    let token = common::admin_token()?;
    let base = &server.base_url;

    // Leftovers from an aborted run
    client
        .delete(format!("{}/adminBook/isbn/{}", base, ISBN))
        .bearer_auth(&token)
        .send()
        .await?;

    let res = client
        .post(format!("{}/adminBook/addBook", base))
        .bearer_auth(&token)
        .json(&json!({
            "isbn13": ISBN,
            "authors": "Integration Author",
            "publication": 2001,
            "title": "Integration Title",
            "rating_avg": 4.0
        }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CREATED, "unexpected status: {}", res.status());
    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["data"]["ratings"]["count"], 0);

    let res = client
        .post(format!("{}/adminBook/addBook", base))
        .bearer_auth(&token)
        .json(&json!({
            "isbn13": ISBN,
            "authors": "Integration Author",
            "publication": 2001,
            "title": "Integration Title"
        }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = client
        .get(format!("{}/book/isbn?isbn={}", base, ISBN))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);

    let res = client
        .put(format!("{}/adminBook/addRating", base))
        .bearer_auth(&token)
        .json(&json!({ "author": "Integration Author", "title": "Integration Title", "rating": 3 }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CREATED);
    let body = res.json::<serde_json::Value>().await?;
    let ratings = &body["data"][0]["ratings"];
    assert_eq!(ratings["rating_3"], 1);
    assert_eq!(ratings["count"], 1);
    assert_eq!(ratings["average"], json!(4.0), "average is not recomputed on new votes");

    let res = client
        .delete(format!("{}/adminBook/isbn/{}", base, ISBN))
        .bearer_auth(&token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);

    let res = client
        .get(format!("{}/book/isbn?isbn={}", base, ISBN))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    Ok(())
}

#[tokio::test]
async fn admin_routes_reject_anonymous_callers() -> Result<()> {
    let Some(server) = common::ensure_server().await? else {
        return Ok(());
    };
    let client = reqwest::Client::new();

    let res = client
        .put(format!("{}/adminBook/addRating", server.base_url))
        .json(&json!({ "author": "a", "title": "b", "rating": 3 }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    Ok(())
}
