//! Integration tests for order placement and order history.
//!
//! These tests drive both services against the in-memory repository and check
//! totals, atomicity, ordering and item fidelity end to end.

use std::sync::Arc;

use common::{OrderId, ProductId, UserId, VariantId};
use domain::{
    CatalogEntry, CatalogError, DomainError, InMemoryCatalog, LineItemRequest,
    OrderPlacementRequest, OrderPlacementService, OrderQueryService, PricingPolicy, Size,
    ValidationError,
};
use order_store::{InMemoryOrderRepository, OrderRepositoryExt, OrderStatus, StoreError};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

struct Harness {
    repo: InMemoryOrderRepository,
    placement: OrderPlacementService<InMemoryOrderRepository>,
    queries: OrderQueryService<InMemoryOrderRepository>,
}

fn harness() -> Harness {
    let repo = InMemoryOrderRepository::new();
    Harness {
        placement: OrderPlacementService::new(repo.clone()),
        queries: OrderQueryService::new(repo.clone()),
        repo,
    }
}

fn item(product: i64, name: &str, size: &str, quantity: i64, price: Decimal) -> LineItemRequest {
    LineItemRequest::new(
        ProductId::new(product),
        VariantId::new(product * 10),
        name,
        size,
        quantity,
        price,
    )
}

fn tee_and_jacket() -> Vec<LineItemRequest> {
    vec![
        item(1, "Classic Tee", "M", 2, dec!(19.99)),
        item(2, "Denim Jacket", "L", 1, dec!(45.00)),
    ]
}

mod totals {
    use super::*;

    #[tokio::test]
    async fn fractional_prices_sum_exactly() {
        let h = harness();
        h.placement
            .place_order(OrderPlacementRequest::new("U101", tee_and_jacket()))
            .await
            .unwrap();

        let orders = h.queries.get_user_orders(&UserId::new("U101")).await.unwrap();
        assert_eq!(orders[0].total_amount, dec!(84.98));
    }

    #[tokio::test]
    async fn large_quantities_sum_exactly() {
        let h = harness();
        let items = vec![
            item(1, "Socks", "S", 3000, dec!(0.10)),
            item(2, "Laces", "S", 1500, dec!(0.20)),
        ];
        h.placement
            .place_order(OrderPlacementRequest::new("U101", items))
            .await
            .unwrap();

        let orders = h.queries.get_user_orders(&UserId::new("U101")).await.unwrap();
        assert_eq!(orders[0].total_amount, dec!(600.00));
    }

    #[tokio::test]
    async fn many_items_sum_to_expected_total() {
        let h = harness();
        let items: Vec<_> = (1..=50)
            .map(|i| item(i, "Pin", "XS", i, dec!(0.01)))
            .collect();
        h.placement
            .place_order(OrderPlacementRequest::new("U101", items))
            .await
            .unwrap();

        // 0.01 * (1 + 2 + ... + 50)
        let orders = h.queries.get_user_orders(&UserId::new("U101")).await.unwrap();
        assert_eq!(orders[0].total_amount, dec!(12.75));
        assert_eq!(orders[0].items.len(), 50);
    }

    #[tokio::test]
    async fn free_items_are_allowed() {
        let h = harness();
        h.placement
            .place_order(OrderPlacementRequest::new(
                "U101",
                vec![item(1, "Sticker", "S", 3, Decimal::ZERO)],
            ))
            .await
            .unwrap();

        let orders = h.queries.get_user_orders(&UserId::new("U101")).await.unwrap();
        assert_eq!(orders[0].total_amount, Decimal::ZERO);
    }
}

mod atomicity {
    use super::*;

    #[tokio::test]
    async fn fault_during_item_writes_leaves_nothing() {
        let h = harness();
        h.repo.fail_after_items(1).await;

        let result = h
            .placement
            .place_order(OrderPlacementRequest::new("U101", tee_and_jacket()))
            .await;

        assert!(matches!(
            result,
            Err(DomainError::Persistence(StoreError::Unavailable(_)))
        ));
        assert_eq!(h.repo.order_count().await, 0);
        assert_eq!(h.repo.item_count().await, 0);
        assert!(
            h.queries
                .get_user_orders(&UserId::new("U101"))
                .await
                .unwrap()
                .is_empty()
        );
    }

    #[tokio::test]
    async fn store_recovers_after_fault() {
        let h = harness();
        h.repo.fail_after_items(1).await;
        let _ = h
            .placement
            .place_order(OrderPlacementRequest::new("U101", tee_and_jacket()))
            .await;

        h.placement
            .place_order(OrderPlacementRequest::new("U101", tee_and_jacket()))
            .await
            .unwrap();

        assert_eq!(h.repo.order_count().await, 1);
        assert_eq!(h.repo.item_count().await, 2);
    }

    #[tokio::test]
    async fn invalid_quantity_never_reaches_the_store() {
        let h = harness();

        for quantity in [0, -3] {
            let items = vec![
                item(1, "Classic Tee", "M", 1, dec!(19.99)),
                item(2, "Denim Jacket", "L", quantity, dec!(45.00)),
            ];
            let result = h
                .placement
                .place_order(OrderPlacementRequest::new("U101", items))
                .await;

            assert!(matches!(
                result,
                Err(DomainError::Validation(ValidationError::InvalidQuantity {
                    index: 1,
                    ..
                }))
            ));
        }

        assert_eq!(h.repo.order_count().await, 0);
        assert_eq!(h.repo.item_count().await, 0);
    }

    #[tokio::test]
    async fn missing_field_is_a_validation_error() {
        let h = harness();
        let mut items = tee_and_jacket();
        items[0].size = None;

        let result = h
            .placement
            .place_order(OrderPlacementRequest::new("U101", items))
            .await;

        assert!(matches!(
            result,
            Err(DomainError::Validation(ValidationError::MissingField {
                index: 0,
                field: "size"
            }))
        ));
        assert_eq!(h.repo.order_count().await, 0);
    }
}

mod history {
    use super::*;

    #[tokio::test]
    async fn orders_come_back_newest_first() {
        let h = harness();
        let mut placed = Vec::new();
        for _ in 0..3 {
            let id = h
                .placement
                .place_order(OrderPlacementRequest::new("U101", tee_and_jacket()))
                .await
                .unwrap();
            placed.push(id);
        }

        let orders = h.queries.get_user_orders(&UserId::new("U101")).await.unwrap();
        let ids: Vec<OrderId> = orders.iter().map(|o| o.id).collect();
        placed.reverse();
        assert_eq!(ids, placed);
        assert!(orders[0].order_date >= orders[1].order_date);
        assert!(orders[1].order_date >= orders[2].order_date);
    }

    #[tokio::test]
    async fn items_round_trip_with_snapshot_values() {
        let h = harness();
        let mut items = tee_and_jacket();
        items[1].size = Some("l".to_string());
        h.placement
            .place_order(OrderPlacementRequest::new("U101", items))
            .await
            .unwrap();

        let orders = h.queries.get_user_orders(&UserId::new("U101")).await.unwrap();
        assert_eq!(orders.len(), 1);

        let order = &orders[0];
        assert_eq!(order.status, OrderStatus::Created);
        assert_eq!(order.total_amount, dec!(84.98));

        let first = &order.items[0];
        assert_eq!(first.product_id, ProductId::new(1));
        assert_eq!(first.product_name, "Classic Tee");
        assert_eq!(first.size, "M");
        assert_eq!(first.quantity, 2);
        assert_eq!(first.price, dec!(19.99));

        let second = &order.items[1];
        assert_eq!(second.product_name, "Denim Jacket");
        assert_eq!(second.size, "L");
        assert_eq!(second.quantity, 1);
        assert_eq!(second.price, dec!(45.00));
    }

    #[tokio::test]
    async fn unknown_user_has_no_orders() {
        let h = harness();
        h.placement
            .place_order(OrderPlacementRequest::new("U101", tee_and_jacket()))
            .await
            .unwrap();

        let orders = h.queries.get_user_orders(&UserId::new("U999")).await.unwrap();
        assert!(orders.is_empty());
    }

    #[tokio::test]
    async fn users_only_see_their_own_orders() {
        let h = harness();
        for user in ["U1", "U2", "U1"] {
            h.placement
                .place_order(OrderPlacementRequest::new(user, tee_and_jacket()))
                .await
                .unwrap();
        }

        assert_eq!(h.repo.count_for_user(&UserId::new("U1")).await.unwrap(), 2);
        assert_eq!(h.repo.count_for_user(&UserId::new("U2")).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn repeated_reads_are_identical() {
        let h = harness();
        h.placement
            .place_order(OrderPlacementRequest::new("U101", tee_and_jacket()))
            .await
            .unwrap();

        let first = h.queries.get_user_orders(&UserId::new("U101")).await.unwrap();
        let second = h.queries.get_user_orders(&UserId::new("U101")).await.unwrap();
        assert_eq!(first, second);
    }
}

mod catalog_verification {
    use super::*;

    async fn verified_harness() -> (Harness, InMemoryCatalog) {
        let catalog = InMemoryCatalog::new();
        catalog
            .insert(
                ProductId::new(1),
                VariantId::new(10),
                CatalogEntry::new("Classic Tee", Size::M, dec!(19.99)),
            )
            .await;
        catalog
            .insert(
                ProductId::new(2),
                VariantId::new(20),
                CatalogEntry::new("Denim Jacket", Size::L, dec!(45.00)),
            )
            .await;

        let repo = InMemoryOrderRepository::new();
        let h = Harness {
            placement: OrderPlacementService::new(repo.clone())
                .with_pricing_policy(PricingPolicy::VerifyWithCatalog(Arc::new(catalog.clone()))),
            queries: OrderQueryService::new(repo.clone()),
            repo,
        };
        (h, catalog)
    }

    #[tokio::test]
    async fn matching_items_are_accepted() {
        let (h, _) = verified_harness().await;

        h.placement
            .place_order(OrderPlacementRequest::new("U101", tee_and_jacket()))
            .await
            .unwrap();

        assert_eq!(h.repo.order_count().await, 1);
    }

    #[tokio::test]
    async fn unknown_variant_is_rejected() {
        let (h, _) = verified_harness().await;
        let items = vec![item(3, "Beanie", "S", 1, dec!(9.99))];

        let result = h
            .placement
            .place_order(OrderPlacementRequest::new("U101", items))
            .await;

        assert!(matches!(
            result,
            Err(DomainError::Validation(ValidationError::UnknownVariant { index: 0, .. }))
        ));
    }

    #[tokio::test]
    async fn tampered_price_is_rejected() {
        let (h, _) = verified_harness().await;
        let items = vec![item(2, "Denim Jacket", "L", 1, dec!(4.50))];

        let result = h
            .placement
            .place_order(OrderPlacementRequest::new("U101", items))
            .await;

        match result {
            Err(DomainError::Validation(ValidationError::PriceMismatch {
                expected, actual, ..
            })) => {
                assert_eq!(expected, dec!(45.00));
                assert_eq!(actual, dec!(4.50));
            }
            other => panic!("expected price mismatch, got {other:?}"),
        }
        assert_eq!(h.repo.order_count().await, 0);
    }

    #[tokio::test]
    async fn wrong_size_is_rejected() {
        let (h, _) = verified_harness().await;
        let items = vec![item(1, "Classic Tee", "XL", 1, dec!(19.99))];

        let result = h
            .placement
            .place_order(OrderPlacementRequest::new("U101", items))
            .await;

        assert!(matches!(
            result,
            Err(DomainError::Validation(ValidationError::SizeMismatch {
                expected: Size::M,
                ..
            }))
        ));
    }

    #[tokio::test]
    async fn unavailable_catalog_fails_placement() {
        let (h, catalog) = verified_harness().await;
        catalog.set_unavailable(true).await;

        let result = h
            .placement
            .place_order(OrderPlacementRequest::new("U101", tee_and_jacket()))
            .await;

        assert!(matches!(
            result,
            Err(DomainError::Catalog(CatalogError::Unavailable(_)))
        ));
        assert_eq!(h.repo.order_count().await, 0);
    }
}
