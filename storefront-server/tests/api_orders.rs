mod common;

use common::{As, TestApp, bw_selection, get, json, order_upload, pdf_with_pages};
use http::StatusCode;
use serde_json::{Value, json as j};

fn with(mut data: Value, extra: Value) -> Value {
    if let (Some(base), Some(extra)) = (data.as_object_mut(), extra.as_object()) {
        for (k, v) in extra {
            base.insert(k.clone(), v.clone());
        }
    }
    data
}

async fn place(app: &TestApp, who: As, data: Value, pages: u32) -> (StatusCode, Value) {
    app.send(order_upload(who, &data, &[("thesis.pdf", pdf_with_pages(pages))]))
        .await
}

#[tokio::test]
async fn test_place_order_uses_server_price() {
    let app = TestApp::new();
    let data = with(bw_selection(), j!({ "clientTotal": 0.01, "totalAmount": 0.01 }));

    let (status, body) = place(&app, As::Customer("u1"), data, 10).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["success"], true);
    assert!(body["orderId"].as_str().unwrap().starts_with("PRN"));
    assert_eq!(body["pricing"]["printingCharge"], 7.5);
    assert_eq!(body["pricing"]["totalAmount"], 7.5);

    let (status, body) = app.send(get("/order", As::Customer("u1"))).await;
    assert_eq!(status, StatusCode::OK);
    let orders = body["orders"].as_array().unwrap();
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0]["files"][0]["detectedPageCount"], 10);
    assert_eq!(orders[0]["files"][0]["serverTrusted"], true);
    assert_eq!(orders[0]["paymentStatus"], "unpaid");
}

#[tokio::test]
async fn test_place_order_requires_identity() {
    let app = TestApp::new();
    let (status, body) = place(&app, As::Anonymous, bw_selection(), 10).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["success"], false);
    assert_eq!(body["code"], 1001);
}

#[tokio::test]
async fn test_upload_rejections() {
    let app = TestApp::new();

    let (status, body) = app
        .send(order_upload(As::Customer("u1"), &bw_selection(), &[]))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 7004);

    let (status, body) = app
        .send(order_upload(
            As::Customer("u1"),
            &bw_selection(),
            &[("notes.pdf", b"just some text".to_vec())],
        ))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 7002);
    assert_eq!(body["details"]["file"], "notes.pdf");

    let (status, body) = app
        .send(order_upload(As::Customer("u1"), &bw_selection(), &[("e.pdf", Vec::new())]))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 7005);
}

#[tokio::test]
async fn test_policy_and_validation_errors() {
    let app = TestApp::new();

    let data = with(bw_selection(), j!({ "binding": "Staple" }));
    let (status, body) = place(&app, As::Customer("u1"), data, 60).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["code"], 4201);
    assert_eq!(body["details"]["cap"], 50);

    let data = with(bw_selection(), j!({ "fulfillment": "Delivery" }));
    let (status, body) = place(&app, As::Customer("u1"), data, 10).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 4103);

    let data = with(bw_selection(), j!({ "copies": 0 }));
    let (status, body) = place(&app, As::Customer("u1"), data, 10).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 4102);

    let data = with(bw_selection(), j!({ "couponCode": "NOPE" }));
    let (status, body) = place(&app, As::Customer("u1"), data, 10).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], 6001);

    let (_, body) = app.send(get("/order", As::Customer("u1"))).await;
    assert!(body["orders"].as_array().unwrap().is_empty());
    assert_eq!(stored_uploads(&app), 0);
}

/// Files under the upload root, `{prefix}/{hash}`
fn stored_uploads(app: &TestApp) -> usize {
    let Ok(prefixes) = std::fs::read_dir(app.state.config.uploads_dir()) else {
        return 0;
    };
    prefixes
        .filter_map(Result::ok)
        .filter_map(|prefix| std::fs::read_dir(prefix.path()).ok())
        .map(|files| files.count())
        .sum()
}

#[tokio::test]
async fn test_only_placed_orders_keep_uploads() {
    let app = TestApp::new();

    let data = with(bw_selection(), j!({ "binding": "Staple" }));
    let (status, _) = place(&app, As::Customer("u1"), data, 60).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(stored_uploads(&app), 0);

    let (status, body) = place(&app, As::Customer("u1"), bw_selection(), 10).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(stored_uploads(&app), 1);
}

#[tokio::test]
async fn test_order_visibility() {
    let app = TestApp::new();
    let (_, body) = place(&app, As::Customer("u1"), bw_selection(), 10).await;
    let uri = format!("/order/{}", body["orderId"].as_str().unwrap());

    let (status, body) = app.send(get(&uri, As::Customer("u1"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["order"]["userId"], "u1");

    let (status, body) = app.send(get(&uri, As::Customer("u2"))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], 2001);

    let (status, _) = app.send(get(&uri, As::Staff("s1"))).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app.send(get("/order/PRN0", As::Staff("s1"))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], 4001);
}

#[tokio::test]
async fn test_wallet_pays_after_coupon() {
    let app = TestApp::new();

    let (status, _) = app
        .send(json(
            "POST",
            "/coupon",
            As::Staff("s1"),
            j!({ "code": "two", "discountType": "flat", "discountValue": 2.0 }),
        ))
        .await;
    assert_eq!(status, StatusCode::OK);
    let (status, body) = app
        .send(json(
            "POST",
            "/wallet/credit",
            As::Staff("s1"),
            j!({ "userId": "u1", "amount": 3.0 }),
        ))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["balance"], 3.0);

    let data = with(bw_selection(), j!({ "couponCode": "TWO", "useWallet": true }));
    let (status, body) = place(&app, As::Customer("u1"), data, 10).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["pricing"]["subtotal"], 7.5);
    assert_eq!(body["pricing"]["couponDiscount"], 2.0);
    assert_eq!(body["pricing"]["walletUsed"], 3.0);
    assert_eq!(body["pricing"]["totalAmount"], 2.5);

    let (_, body) = app.send(get("/wallet/balance", As::Customer("u1"))).await;
    assert_eq!(body["balance"], 0.0);

    let (_, body) = app.send(get("/wallet", As::Customer("u1"))).await;
    let ledger = body["wallet"]["transactions"].as_array().unwrap();
    assert_eq!(ledger.len(), 2);
    assert_eq!(ledger[1]["type"], "debit");
}

#[tokio::test]
async fn test_staff_edit_reprices() {
    let app = TestApp::new();
    let (_, body) = place(&app, As::Customer("u1"), bw_selection(), 10).await;
    let order_id = body["orderId"].as_str().unwrap().to_string();
    let uri = format!("/order/edit/{order_id}");
    let edit = with(bw_selection(), j!({ "copies": 2 }));

    let (status, body) = app
        .send(json("POST", &uri, As::Customer("u1"), edit.clone()))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], 2003);

    let (status, body) = app.send(json("POST", &uri, As::Staff("s1"), edit)).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["order"]["pricing"]["totalAmount"], 15.0);
    assert_eq!(body["order"]["editCount"], 1);
    assert_eq!(body["order"]["paymentStatus"], "unpaid");
    assert_eq!(body["order"]["selection"]["copies"], 2);
}
