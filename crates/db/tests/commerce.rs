//! Integration tests for the catalog, orders, finances and companies.

use inutile_core::finance::{PaymentCard, PaymentCards};
use inutile_db::models::company::CreateCompany;
use inutile_db::models::finance::CreateBill;
use inutile_db::models::order::CreateOrder;
use inutile_db::models::product_card::CreateProductCard;
use inutile_db::models::subscription::{CreatePlan, CreateUserSubscription, UpdateUserSubscription};
use inutile_db::models::user::CreateUser;
use inutile_db::repositories::{
    AccountRepo, BillRepo, CompanyRepo, FinanceRepo, OrderRepo, PhysicalCardRepo, ProductCardRepo,
    SubscriptionRepo, UserRepo, UserSubscriptionRepo,
};
use sqlx::PgPool;

fn product(name: &str, stock: i32, active: bool) -> CreateProductCard {
    CreateProductCard {
        name: name.to_string(),
        card_type: "classic".to_string(),
        description: None,
        price: 29.9,
        stock,
        image: None,
        is_active: Some(active),
    }
}

fn new_user(email: &str) -> CreateUser {
    CreateUser {
        email: email.to_string(),
        password_hash: "hash".to_string(),
        first_name: "Test".to_string(),
        last_name: "User".to_string(),
        phone: None,
        role: None,
        company_id: None,
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn low_stock_returns_active_products_below_threshold_ascending(pool: PgPool) {
    ProductCardRepo::create(&pool, &product("plenty", 50, true)).await.unwrap();
    ProductCardRepo::create(&pool, &product("few", 5, true)).await.unwrap();
    ProductCardRepo::create(&pool, &product("some", 19, true)).await.unwrap();
    ProductCardRepo::create(&pool, &product("hidden", 1, false)).await.unwrap();
    ProductCardRepo::create(&pool, &product("edge", 20, true)).await.unwrap();

    let low = ProductCardRepo::low_stock(&pool, 20).await.unwrap();
    let names: Vec<_> = low.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, ["few", "some"]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn toggle_flips_product_activity(pool: PgPool) {
    let p = ProductCardRepo::create(&pool, &product("t", 3, true)).await.unwrap();
    let toggled = ProductCardRepo::toggle_active(&pool, p.id).await.unwrap().unwrap();
    assert!(!toggled.is_active);
    assert!(ProductCardRepo::toggle_active(&pool, 9_999).await.unwrap().is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn negative_order_total_is_rejected(pool: PgPool) {
    let err = OrderRepo::create(
        &pool,
        &CreateOrder {
            user_id: None,
            customer_name: "Neg".into(),
            email: "neg@x.io".into(),
            items: vec![],
            total: -1.0,
            card_design: None,
            shipping_address: None,
        },
    )
    .await
    .unwrap_err();
    match err {
        sqlx::Error::Database(db) => assert_eq!(db.constraint(), Some("ck_orders_total")),
        other => panic!("expected check violation, got {other:?}"),
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn completed_revenue_only_counts_completed_orders(pool: PgPool) {
    for total in [10.0, 20.5] {
        let order = OrderRepo::create(
            &pool,
            &CreateOrder {
                user_id: None,
                customer_name: "C".into(),
                email: "c@x.io".into(),
                items: vec!["classic".into()],
                total,
                card_design: None,
                shipping_address: Some("1 rue de Paris".into()),
            },
        )
        .await
        .unwrap();
        if total > 15.0 {
            OrderRepo::update_status(&pool, order.id, "processing", None).await.unwrap();
            OrderRepo::update_status(&pool, order.id, "completed", Some("TRK1")).await.unwrap();
        }
    }
    assert_eq!(OrderRepo::completed_revenue(&pool).await.unwrap(), 20.5);
    assert_eq!(OrderRepo::count_by_status(&pool, "pending").await.unwrap(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn payment_cards_round_trip_through_jsonb(pool: PgPool) {
    let (user, _) = AccountRepo::register(&pool, &new_user("pay@x.io"), "pay").await.unwrap();
    let mut cards = PaymentCards::default();
    cards.add(PaymentCard {
        id: "c1".into(),
        last4: "4242".into(),
        brand: "visa".into(),
        expiry_month: 12,
        expiry_year: 2030,
        is_default: false,
    });

    FinanceRepo::set_payment_cards(&pool, user.id, &cards).await.unwrap();
    let finance = FinanceRepo::get_or_create(&pool, user.id).await.unwrap();
    assert_eq!(finance.payment_cards.0, cards);
    assert!(finance.payment_cards.0.default_card().is_some());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn bills_are_listed_newest_first(pool: PgPool) {
    let (user, _) = AccountRepo::register(&pool, &new_user("bill@x.io"), "bill").await.unwrap();
    for desc in ["first", "second", "third"] {
        BillRepo::create(
            &pool,
            &CreateBill {
                user_id: user.id,
                amount: 9.99,
                currency: None,
                description: desc.into(),
                status: Some("paid".into()),
                invoice_url: None,
            },
        )
        .await
        .unwrap();
    }
    let page = BillRepo::list_by_user(&pool, user.id, 2, 0).await.unwrap();
    assert_eq!(page.len(), 2);
    assert_eq!(page[0].description, "third");
    assert!(page[0].paid_at.is_some());
    assert_eq!(page[0].currency, "EUR");
    assert_eq!(BillRepo::count_by_user(&pool, user.id).await.unwrap(), 3);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn physical_card_status_stamps_timestamps(pool: PgPool) {
    let (user, _) = AccountRepo::register(&pool, &new_user("pc@x.io"), "pc").await.unwrap();
    let card = PhysicalCardRepo::create(&pool, user.id, "metal").await.unwrap();
    assert_eq!(card.status, "ordered");

    let shipped = PhysicalCardRepo::update_status(&pool, card.id, "shipped", Some("TRK"))
        .await
        .unwrap()
        .unwrap();
    assert!(shipped.shipped_at.is_some());
    assert!(shipped.delivered_at.is_none());
    assert_eq!(shipped.tracking_number.as_deref(), Some("TRK"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn company_creation_attaches_admin(pool: PgPool) {
    let (admin, _) = AccountRepo::register(&pool, &new_user("boss@acme.io"), "boss").await.unwrap();
    let company = CompanyRepo::create(
        &pool,
        &CreateCompany {
            name: "Acme".into(),
            slug: "ACME".into(),
            logo: None,
            description: None,
            industry: None,
            website: None,
            email: None,
            phone: None,
            address: None,
            billing_address: None,
            admin_user_id: admin.id,
            subscription_id: None,
            max_employees: None,
            max_cards: Some(2),
            notes: None,
        },
    )
    .await
    .unwrap();

    assert_eq!(company.slug, "acme");
    assert_eq!(company.max_employees, 10);
    let admin = UserRepo::find_by_id(&pool, admin.id).await.unwrap().unwrap();
    assert_eq!(admin.company_id, Some(company.id));
    assert_eq!(CompanyRepo::count_non_admin_members(&pool, company.id).await.unwrap(), 0);

    let listed = CompanyRepo::list_with_counts(&pool).await.unwrap();
    assert_eq!(listed[0].employee_count, 1);
    assert_eq!(listed[0].card_count, 0);

    assert!(CompanyRepo::delete(&pool, company.id).await.unwrap());
    let admin = UserRepo::find_by_id(&pool, admin.id).await.unwrap().unwrap();
    assert_eq!(admin.company_id, None);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn plan_stats_and_cancellation_stamp(pool: PgPool) {
    let (user, _) = AccountRepo::register(&pool, &new_user("sub@x.io"), "sub").await.unwrap();
    let plan = SubscriptionRepo::create(
        &pool,
        &CreatePlan {
            name: "Pro".into(),
            slug: "pro".into(),
            description: None,
            price: 120.0,
            currency: None,
            billing_interval: Some("yearly".into()),
            features: vec!["analytics".into()],
            max_profiles: None,
            max_cards: None,
            custom_domain: None,
            analytics: Some(true),
            priority: Some(2),
            is_active: None,
        },
    )
    .await
    .unwrap();
    assert_eq!(plan.currency, "EUR");

    let binding = UserSubscriptionRepo::create(
        &pool,
        &CreateUserSubscription {
            user_id: user.id,
            subscription_id: plan.id,
            start_date: None,
            end_date: None,
            auto_renew: None,
            next_payment_date: None,
            payment_method: None,
        },
    )
    .await
    .unwrap();

    let stats = SubscriptionRepo::list_with_stats(&pool).await.unwrap();
    assert_eq!(stats[0].active_subscribers, 1);
    assert_eq!(UserSubscriptionRepo::list_active_detailed(&pool).await.unwrap()[0].plan_interval, "yearly");

    let cancelled = UserSubscriptionRepo::update(
        &pool,
        binding.id,
        &UpdateUserSubscription {
            status: Some("cancelled".into()),
            ..Default::default()
        },
    )
    .await
    .unwrap()
    .unwrap();
    assert!(cancelled.cancelled_at.is_some());
    assert_eq!(UserSubscriptionRepo::count_active_by_plan(&pool, plan.id).await.unwrap(), 0);
}
