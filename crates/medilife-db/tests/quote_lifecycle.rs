//! End-to-end quote lifecycle against an in-memory database.

use medilife_core::{
    Counterparties, LineItemDraft, Money, QuoteDraft, QuoteSettings, MIN_EDITOR_ROWS,
};
use medilife_db::{AuditedStore, Database, DbConfig, NamedUser, QuoteService, ServiceError};

async fn service() -> (Database, QuoteService<AuditedStore<NamedUser>>) {
    let db = Database::new(DbConfig::in_memory()).await.unwrap();
    let service = db.quote_service(NamedUser::new("mgarcia"), QuoteSettings::default());
    (db, service)
}

fn row(detail: &str, quantity: i64, price: &str) -> LineItemDraft {
    LineItemDraft {
        detail: Some(detail.to_string()),
        quantity,
        unit_price: price.parse().unwrap(),
        ..LineItemDraft::default()
    }
}

fn draft(number: Option<i64>, items: Vec<LineItemDraft>) -> QuoteDraft {
    QuoteDraft {
        number,
        issuer_id: Some("emp-1".to_string()),
        counterparties: Counterparties {
            patient_id: Some("pac-7".to_string()),
            ..Counterparties::default()
        },
        items,
        ..QuoteDraft::default()
    }
}

#[tokio::test]
async fn test_create_edit_print() {
    let (_db, quotes) = service().await;

    let mut new = quotes.blank_draft(Some("emp-1")).await.unwrap();
    new.items[0] = row("Placa de bloqueo", 1, "1850.00");
    new.items[2] = row("Tornillo cortical 3,5 mm", 4, "125.50");

    let quote = quotes.create(new).await.unwrap();
    assert_eq!(quote.header.number, 1);
    assert_eq!(quote.items.len(), 2);
    assert_eq!(quote.total(), Money::from_cents(185_000 + 4 * 12_550));

    let printable = quotes.render_for_print(&quote.id).await.unwrap();
    assert_eq!(printable.total, quote.total());
    assert_eq!(
        printable.total_words,
        "DOS MIL TRESCIENTOS CINCUENTA Y DOS PESOS CON 00/100"
    );
    assert_eq!(printable.items[1].detail, "Tornillo cortical 3,5 mm");
    assert_eq!(printable.items[1].line_total.cents(), 50_200);

    let edit = quotes.edit_draft(&quote.id).await.unwrap();
    assert_eq!(edit.items.len(), MIN_EDITOR_ROWS);
    assert_eq!(edit.items[0].id.as_deref(), Some(quote.items[0].id.as_str()));
    assert!(edit.items[2..].iter().all(|r| r.id.is_none() && r.is_blank()));
}

#[tokio::test]
async fn test_reconciliation_preserves_identities() {
    let (_db, quotes) = service().await;
    let quote = quotes
        .create(draft(
            None,
            vec![row("Placa", 1, "100"), row("Clavo", 2, "50"), row("Arandela", 10, "1")],
        ))
        .await
        .unwrap();
    let ids: Vec<String> = quote.items_in_order().iter().map(|i| i.id.clone()).collect();

    let mut edit = quotes.edit_draft(&quote.id).await.unwrap();
    // keep Placa, change Clavo, clear Arandela, add a new row
    edit.items[1].quantity = 5;
    edit.items[2].detail = Some("   ".to_string());
    edit.items[3] = row("Tutor externo", 1, "3100");

    let updated = quotes.update(&quote.id, edit).await.unwrap();
    let items = updated.items_in_order();

    assert_eq!(items.len(), 3);
    assert_eq!(items[0].id, ids[0]);
    assert_eq!(items[1].id, ids[1]);
    assert_eq!(items[1].fields.quantity, 5);
    assert!(!ids.contains(&items[2].id));
    assert_eq!(items[2].fields.detail, "Tutor externo");
    assert_eq!(items[2].fields.order, 4);

    assert_eq!(updated.total().cents(), 100_00 + 5 * 50_00 + 3100_00);
}

#[tokio::test]
async fn test_update_is_idempotent() {
    let (_db, quotes) = service().await;
    let quote = quotes
        .create(draft(None, vec![row("Placa", 1, "100"), row("Clavo", 2, "50")]))
        .await
        .unwrap();

    let ids = |q: &medilife_core::Quote| -> Vec<String> {
        q.items_in_order().iter().map(|i| i.id.clone()).collect()
    };

    let mut edit = quotes.edit_draft(&quote.id).await.unwrap();
    edit.items[0].unit_price = "120".parse().unwrap();
    edit.items[1].detail = None;

    let first = quotes.update(&quote.id, edit.clone()).await.unwrap();
    let second = quotes.update(&quote.id, edit).await.unwrap();

    assert_eq!(ids(&first), ids(&second));
    assert_eq!(first.total(), second.total());
    assert_eq!(second.total().cents(), 120_00);

    // a row added once gets an identity; the next edit form carries it
    let mut add = quotes.edit_draft(&quote.id).await.unwrap();
    add.items[1] = row("Arandela", 3, "2");
    let added = quotes.update(&quote.id, add).await.unwrap();

    let resubmit = quotes.edit_draft(&quote.id).await.unwrap();
    let third = quotes.update(&quote.id, resubmit.clone()).await.unwrap();
    let fourth = quotes.update(&quote.id, resubmit).await.unwrap();

    assert_eq!(ids(&added), ids(&third));
    assert_eq!(ids(&third), ids(&fourth));
    assert_eq!(fourth.total().cents(), 120_00 + 3 * 2_00);
}

#[tokio::test]
async fn test_all_blank_rows_yield_empty_quote() {
    let (_db, quotes) = service().await;
    let quote = quotes
        .create(draft(
            None,
            vec![row("   ", 3, "100"), row("Placa", 0, "100"), LineItemDraft::blank(3)],
        ))
        .await
        .unwrap();

    assert!(quote.items.is_empty());
    assert_eq!(quote.total(), Money::zero());

    let printable = quotes.render_for_print(&quote.id).await.unwrap();
    assert_eq!(printable.total_words, "CERO PESOS CON 00/100");
}

#[tokio::test]
async fn test_stale_identity_is_skipped() {
    let (_db, quotes) = service().await;
    let other = quotes
        .create(draft(Some(10), vec![row("Ajeno", 1, "1")]))
        .await
        .unwrap();
    let quote = quotes
        .create(draft(Some(11), vec![row("Placa", 1, "100")]))
        .await
        .unwrap();

    let mut edit = quote.to_draft();
    edit.items.push(LineItemDraft {
        id: Some(other.items[0].id.clone()),
        ..row("Robado", 1, "999")
    });

    let updated = quotes.update(&quote.id, edit).await.unwrap();
    assert_eq!(updated.items.len(), 1);
    assert_eq!(updated.items[0].fields.detail, "Placa");

    let untouched = quotes.get(&other.id).await.unwrap();
    assert_eq!(untouched.items[0].fields.detail, "Ajeno");
}

#[tokio::test]
async fn test_concurrent_create_same_number() {
    let (_db, quotes) = service().await;

    let (a, b) = tokio::join!(
        quotes.create(draft(Some(42), vec![row("Placa", 1, "100")])),
        quotes.create(draft(Some(42), vec![row("Clavo", 1, "50")])),
    );

    let results = [a, b];
    let created = results.iter().filter(|r| r.is_ok()).count();
    let duplicates = results
        .iter()
        .filter(|r| matches!(r, Err(e) if e.is_duplicate_number()))
        .count();
    assert_eq!(created, 1);
    assert_eq!(duplicates, 1);

    assert_eq!(quotes.list().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_duplicate_number_is_not_renumbered() {
    let (_db, quotes) = service().await;
    quotes.create(draft(Some(5), vec![])).await.unwrap();

    let err = quotes.create(draft(Some(5), vec![])).await.unwrap_err();
    match err {
        ServiceError::Core(medilife_core::CoreError::DuplicateNumber { issuer_id, number }) => {
            assert_eq!(issuer_id, "emp-1");
            assert_eq!(number, 5);
        }
        other => panic!("unexpected error: {other}"),
    }

    // another issuer may reuse the number
    let mut other_issuer = draft(Some(5), vec![]);
    other_issuer.issuer_id = Some("emp-2".to_string());
    quotes.create(other_issuer).await.unwrap();

    assert_eq!(quotes.next_number().await.unwrap(), 6);
}

#[tokio::test]
async fn test_renumber_onto_taken_number() {
    let (_db, quotes) = service().await;
    quotes.create(draft(Some(1), vec![])).await.unwrap();
    let second = quotes.create(draft(Some(2), vec![])).await.unwrap();

    let mut edit = second.to_draft();
    edit.number = Some(1);
    assert!(quotes
        .update(&second.id, edit)
        .await
        .unwrap_err()
        .is_duplicate_number());

    assert_eq!(quotes.get(&second.id).await.unwrap().header.number, 2);
}

#[tokio::test]
async fn test_delete_cascades() {
    let (db, quotes) = service().await;
    let quote = quotes
        .create(draft(None, vec![row("Placa", 1, "100"), row("Clavo", 1, "5")]))
        .await
        .unwrap();

    quotes.delete(&quote.id).await.unwrap();

    assert!(quotes.get(&quote.id).await.unwrap_err().is_not_found());
    assert!(db.quotes().get_items(&quote.id).await.unwrap().is_empty());
    assert!(quotes.delete(&quote.id).await.unwrap_err().is_not_found());
}

#[tokio::test]
async fn test_update_missing_quote() {
    let (_db, quotes) = service().await;
    let err = quotes.update("missing", draft(None, vec![])).await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_list_summaries() {
    let (_db, quotes) = service().await;
    let mut older = draft(Some(1), vec![row("Placa", 2, "10")]);
    older.date = chrono::NaiveDate::from_ymd_opt(2024, 1, 15);
    quotes.create(older).await.unwrap();
    quotes.create(draft(Some(2), vec![])).await.unwrap();
    quotes.create(draft(Some(3), vec![])).await.unwrap();

    let listed = quotes.list().await.unwrap();
    let numbers: Vec<i64> = listed.iter().map(|s| s.number).collect();
    assert_eq!(numbers, vec![3, 2, 1]);
    assert_eq!(listed[2].total.cents(), 2_000);
    assert_eq!(listed[2].item_count, 1);
    assert_eq!(listed[0].audit.created_by.as_deref(), Some("mgarcia"));
}

#[tokio::test]
async fn test_untotalable_draft_is_rejected() {
    let (_db, quotes) = service().await;
    let huge = row("Placa", 1_000_000, "10000000000000.00");

    let err = quotes.create(draft(None, vec![huge.clone()])).await.unwrap_err();
    assert!(matches!(
        err,
        ServiceError::Rejected {
            error: medilife_core::ValidationError::OutOfRange { .. },
            ..
        }
    ));
    assert_eq!(err.rejected_draft().map(|d| d.items.len()), Some(1));
    assert!(quotes.list().await.unwrap().is_empty());

    let quote = quotes.create(draft(None, vec![row("Placa", 1, "100")])).await.unwrap();
    let mut edit = quotes.edit_draft(&quote.id).await.unwrap();
    edit.items[1] = huge;
    assert!(matches!(
        quotes.update(&quote.id, edit).await.unwrap_err(),
        ServiceError::Rejected { .. }
    ));
    assert_eq!(quotes.get(&quote.id).await.unwrap().total().cents(), 100_00);
}
