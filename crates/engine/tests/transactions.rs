use std::{sync::Arc, time::Duration};

use chrono::{DateTime, Utc};
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Statement};

use engine::{
    AddTransactionCmd, DeleteTransactionCmd, EditTransactionCmd, Engine, EngineError, Ledger,
    LedgerStore, MemoryStore, Period, TransactionKind, User,
};
use migration::MigratorTrait;
use uuid::Uuid;

const ALICE: &str = "alice@example.com";

async fn engine_with_db() -> (Engine, DatabaseConnection) {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = Engine::builder().database(db.clone()).build().unwrap();
    engine
        .upsert_user(ALICE, serde_json::json!({ "name": "Alice" }))
        .await
        .unwrap();
    (engine, db)
}

async fn engine_in_memory() -> Engine<MemoryStore> {
    let engine = Engine::builder().store(MemoryStore::new()).build().unwrap();
    engine
        .upsert_user(ALICE, serde_json::json!({ "name": "Alice" }))
        .await
        .unwrap();
    engine
}

fn period<'a>(periods: &'a [Period], name: &str) -> &'a Period {
    periods
        .iter()
        .find(|p| p.name == name)
        .unwrap_or_else(|| panic!("period {name} missing"))
}

fn assert_balanced(periods: &[Period]) {
    for p in periods {
        let income: i64 = p
            .transactions
            .iter()
            .filter(|tx| tx.kind == TransactionKind::Income)
            .map(|tx| tx.amount_minor)
            .sum();
        let expenses: i64 = p
            .transactions
            .iter()
            .filter(|tx| tx.kind == TransactionKind::Expense)
            .map(|tx| tx.amount_minor)
            .sum();
        assert_eq!(p.income, income, "income of {}", p.name);
        assert_eq!(p.expenses, expenses, "expenses of {}", p.name);
        assert_eq!(p.savings, income - expenses, "savings of {}", p.name);
    }
}

async fn add<S: LedgerStore>(
    engine: &Engine<S>,
    name: &str,
    kind: TransactionKind,
    amount: i64,
) -> (Vec<Period>, Uuid) {
    let periods = engine
        .add_transaction(AddTransactionCmd::new(ALICE, name, kind, amount))
        .await
        .unwrap();
    let id = period(&periods, name).transactions.last().unwrap().id;
    (periods, id)
}

async fn new_period_is_created<S: LedgerStore>(engine: Engine<S>) {
    add(&engine, "Jan", TransactionKind::Income, 300).await;
    let (periods, _) = add(&engine, "Feb", TransactionKind::Expense, 50).await;

    assert_eq!(periods.len(), 2);
    let feb = period(&periods, "Feb");
    assert_eq!((feb.income, feb.expenses, feb.savings), (0, 50, -50));
    assert_eq!(feb.transactions.len(), 1);
    assert_eq!(feb.transactions[0].kind, TransactionKind::Expense);
    assert_eq!(period(&periods, "Jan").income, 300);
    assert_balanced(&periods);
}

async fn add_then_delete_restores_period<S: LedgerStore>(engine: Engine<S>) {
    add(&engine, "Jan", TransactionKind::Expense, 20).await;
    let before = engine.ledger(ALICE).await.unwrap();

    let (_, id) = add(&engine, "Jan", TransactionKind::Income, 100).await;
    let after = engine
        .delete_transaction(DeleteTransactionCmd::new(ALICE, "Jan", id))
        .await
        .unwrap();

    assert_eq!(after, before);
    assert_eq!(engine.ledger(ALICE).await.unwrap(), before);
}

async fn edit_moves_amount_between_categories<S: LedgerStore>(engine: Engine<S>) {
    let (_, id) = add(&engine, "Jan", TransactionKind::Income, 100).await;

    let periods = engine
        .edit_transaction(EditTransactionCmd::new(
            ALICE,
            "Jan",
            id,
            TransactionKind::Expense,
            40,
        ))
        .await
        .unwrap();

    let jan = period(&periods, "Jan");
    assert_eq!((jan.income, jan.expenses, jan.savings), (0, 40, -40));
    let tx = &jan.transactions[0];
    assert_eq!(tx.id, id);
    assert_eq!((tx.kind, tx.amount_minor), (TransactionKind::Expense, 40));
    assert_eq!(engine.ledger(ALICE).await.unwrap(), periods);
}

async fn not_found_leaves_sums<S: LedgerStore>(engine: Engine<S>) {
    let (_, jan_id) = add(&engine, "Jan", TransactionKind::Income, 100).await;
    add(&engine, "Feb", TransactionKind::Expense, 10).await;
    let before = engine.ledger(ALICE).await.unwrap();
    let missing = Uuid::new_v4();

    let err = engine
        .edit_transaction(EditTransactionCmd::new(
            ALICE,
            "Jan",
            missing,
            TransactionKind::Expense,
            1,
        ))
        .await
        .unwrap_err();
    assert_eq!(err, EngineError::TransactionNotFound(missing.to_string()));
    assert!(err.is_not_found());

    // The id exists, but in another period.
    let err = engine
        .delete_transaction(DeleteTransactionCmd::new(ALICE, "Feb", jan_id))
        .await
        .unwrap_err();
    assert_eq!(err, EngineError::TransactionNotFound(jan_id.to_string()));

    let err = engine
        .delete_transaction(DeleteTransactionCmd::new(ALICE, "Mar", jan_id))
        .await
        .unwrap_err();
    assert_eq!(err, EngineError::PeriodNotFound("Mar".to_string()));

    let err = engine
        .add_transaction(AddTransactionCmd::new(
            "bob@example.com",
            "Jan",
            TransactionKind::Income,
            5,
        ))
        .await
        .unwrap_err();
    assert_eq!(err, EngineError::UserNotFound("bob@example.com".to_string()));

    assert_eq!(engine.ledger(ALICE).await.unwrap(), before);
}

async fn invalid_amounts_write_nothing<S: LedgerStore>(engine: Engine<S>) {
    let (_, id) = add(&engine, "Jan", TransactionKind::Income, 100).await;
    let before = engine.ledger(ALICE).await.unwrap();

    let err = engine
        .add_transaction(AddTransactionCmd::new(ALICE, "Apr", TransactionKind::Income, 0))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidAmount(_)));

    let err = engine
        .edit_transaction(EditTransactionCmd::new(
            ALICE,
            "Jan",
            id,
            TransactionKind::Income,
            -3,
        ))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidAmount(_)));

    assert_eq!(engine.ledger(ALICE).await.unwrap(), before);
}

/// Deterministic mixed workload; every bucket must stay balanced after each
/// step, as returned and as stored.
async fn invariant_holds_for_every_period<S: LedgerStore>(engine: Engine<S>) {
    let names = ["Jan", "Feb", "Mar"];
    let mut ids: Vec<(usize, Uuid)> = Vec::new();
    let mut seed: u64 = 0x2545_f491;

    for step in 0..60u64 {
        seed = seed.wrapping_mul(6_364_136_223_846_793_005).wrapping_add(1);
        let pick = (seed >> 33) as usize;
        let kind = if pick % 2 == 0 {
            TransactionKind::Income
        } else {
            TransactionKind::Expense
        };
        let amount = (pick % 500) as i64 + 1;

        let periods = match (step % 4, ids.is_empty()) {
            (0 | 1, _) | (_, true) => {
                let slot = pick % names.len();
                let (periods, id) = add(&engine, names[slot], kind, amount).await;
                ids.push((slot, id));
                periods
            }
            (2, false) => {
                let (slot, id) = ids[pick % ids.len()];
                engine
                    .edit_transaction(EditTransactionCmd::new(ALICE, names[slot], id, kind, amount))
                    .await
                    .unwrap()
            }
            _ => {
                let (slot, id) = ids.remove(pick % ids.len());
                engine
                    .delete_transaction(DeleteTransactionCmd::new(ALICE, names[slot], id))
                    .await
                    .unwrap()
            }
        };

        assert_balanced(&periods);
        assert_eq!(engine.ledger(ALICE).await.unwrap(), periods);
    }
}

macro_rules! both_stores {
    ($($name:ident),* $(,)?) => {
        mod database {
            $(
                #[tokio::test]
                async fn $name() {
                    let (engine, _db) = super::engine_with_db().await;
                    super::$name(engine).await;
                }
            )*
        }

        mod memory {
            $(
                #[tokio::test]
                async fn $name() {
                    super::$name(super::engine_in_memory().await).await;
                }
            )*
        }
    };
}

both_stores!(
    new_period_is_created,
    add_then_delete_restores_period,
    edit_moves_amount_between_categories,
    not_found_leaves_sums,
    invalid_amounts_write_nothing,
    invariant_holds_for_every_period,
);

#[tokio::test]
async fn repeated_reads_are_identical() {
    let (engine, _db) = engine_with_db().await;
    add(&engine, "Jan", TransactionKind::Income, 12).await;
    add(&engine, "Jan", TransactionKind::Expense, 5).await;

    let first = engine.ledger(ALICE).await.unwrap();
    let second = engine.ledger(ALICE).await.unwrap();
    assert_eq!(first, second);
}

#[tokio::test]
async fn ledger_survives_a_new_engine() {
    let (engine, db) = engine_with_db().await;
    add(&engine, "Jan", TransactionKind::Income, 12).await;
    add(&engine, "Feb", TransactionKind::Expense, 7).await;
    let (expected, _) = add(&engine, "Jan", TransactionKind::Expense, 2).await;

    let reopened = Engine::builder().database(db).build().unwrap();
    let periods = reopened.ledger(ALICE).await.unwrap();

    assert_eq!(periods, expected);
    let names: Vec<_> = periods.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, ["Jan", "Feb"]);
}

#[tokio::test]
async fn stale_stored_savings_is_recomputed_on_load() {
    let (engine, db) = engine_with_db().await;
    add(&engine, "Jan", TransactionKind::Income, 12).await;

    let backend = db.get_database_backend();
    db.execute(Statement::from_sql_and_values(
        backend,
        "UPDATE periods SET savings = ? WHERE user_email = ?",
        vec![999i64.into(), ALICE.into()],
    ))
    .await
    .unwrap();

    let periods = engine.ledger(ALICE).await.unwrap();
    assert_eq!(period(&periods, "Jan").savings, 12);
}

#[tokio::test]
async fn saving_without_a_user_changes_nothing() {
    let (engine, _db) = engine_with_db().await;
    let err = engine
        .store()
        .save_ledger(&Ledger::new("ghost@example.com"))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::NoChangeMade(_)));

    let memory = MemoryStore::new();
    let err = memory
        .save_ledger(&Ledger::new("ghost@example.com"))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::NoChangeMade(_)));
}

#[tokio::test]
async fn failed_save_rolls_back_every_row() {
    let (engine, _db) = engine_with_db().await;
    add(&engine, "Jan", TransactionKind::Income, 100).await;
    add(&engine, "Jan", TransactionKind::Expense, 30).await;
    let before = engine.ledger(ALICE).await.unwrap();

    // The old rows are deleted first, then the duplicated id in "Feb" breaks
    // the second insert pass.
    let mut ledger = engine.store().load_ledger(ALICE).await.unwrap();
    let duplicate = ledger.period("Jan").unwrap().transactions[0].clone();
    ledger.find_or_create("Feb").push(duplicate).unwrap();

    let err = engine.store().save_ledger(&ledger).await.unwrap_err();
    assert!(matches!(err, EngineError::Database(_)), "{err:?}");

    let after = engine.ledger(ALICE).await.unwrap();
    assert_eq!(after, before);
    assert_balanced(&after);
}

#[tokio::test]
async fn upsert_user_reports_creation_once() {
    let (engine, _db) = engine_with_db().await;

    let (user, created) = engine
        .upsert_user("bob@example.com", serde_json::json!({ "name": "Bob" }))
        .await
        .unwrap();
    assert!(created);
    assert_eq!(user.email, "bob@example.com");
    assert!(engine.ledger("bob@example.com").await.unwrap().is_empty());

    let (user, created) = engine
        .upsert_user(" bob@example.com ", serde_json::json!({ "name": "Robert" }))
        .await
        .unwrap();
    assert!(!created);
    assert_eq!(user.user_info["name"], "Robert");

    let stored = engine.user("bob@example.com").await.unwrap();
    assert_eq!(stored.user_info, user.user_info);
    assert!(stored.updated_at >= stored.created_at);
    assert_eq!(
        engine.user("carol@example.com").await.unwrap_err(),
        EngineError::UserNotFound("carol@example.com".to_string())
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_adds_lose_no_update() {
    let (engine, _db) = engine_with_db().await;
    let engine = Arc::new(engine);

    let mut tasks = tokio::task::JoinSet::new();
    for i in 1..=40i64 {
        let engine = Arc::clone(&engine);
        tasks.spawn(async move {
            let kind = if i % 3 == 0 {
                TransactionKind::Expense
            } else {
                TransactionKind::Income
            };
            engine
                .add_transaction(AddTransactionCmd::new(ALICE, "Jan", kind, i))
                .await
                .unwrap();
        });
    }
    while let Some(res) = tasks.join_next().await {
        res.unwrap();
    }

    let periods = engine.ledger(ALICE).await.unwrap();
    let jan = period(&periods, "Jan");
    let expenses: i64 = (1..=40).filter(|i| i % 3 == 0).sum();
    let income: i64 = (1..=40).filter(|i| i % 3 != 0).sum();
    assert_eq!(jan.transactions.len(), 40);
    assert_eq!((jan.income, jan.expenses), (income, expenses));
    assert_balanced(&periods);
}

/// A store whose writes never finish in time.
#[derive(Clone, Default)]
struct SlowStore {
    inner: MemoryStore,
    write_delay: Duration,
}

impl LedgerStore for SlowStore {
    async fn load_ledger(&self, user_email: &str) -> Result<Ledger, EngineError> {
        self.inner.load_ledger(user_email).await
    }

    async fn save_ledger(&self, ledger: &Ledger) -> Result<(), EngineError> {
        tokio::time::sleep(self.write_delay).await;
        self.inner.save_ledger(ledger).await
    }

    async fn upsert_user(
        &self,
        email: &str,
        user_info: serde_json::Value,
        now: DateTime<Utc>,
    ) -> Result<(User, bool), EngineError> {
        self.inner.upsert_user(email, user_info, now).await
    }

    async fn load_user(&self, email: &str) -> Result<User, EngineError> {
        self.inner.load_user(email).await
    }
}

#[tokio::test]
async fn slow_store_times_out_without_writing() {
    let store = SlowStore {
        inner: MemoryStore::new(),
        write_delay: Duration::from_millis(500),
    };
    let engine = Engine::builder()
        .store(store.clone())
        .store_timeout(Duration::from_millis(50))
        .build()
        .unwrap();
    engine.upsert_user(ALICE, serde_json::Value::Null).await.unwrap();

    let err = engine
        .add_transaction(AddTransactionCmd::new(ALICE, "Jan", TransactionKind::Income, 10))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::StoreTimeout(_)));

    tokio::time::sleep(Duration::from_millis(600)).await;
    assert!(engine.ledger(ALICE).await.unwrap().is_empty());
}

#[tokio::test]
async fn zero_timeout_is_rejected() {
    let err = Engine::builder()
        .store(MemoryStore::new())
        .store_timeout(Duration::ZERO)
        .build()
        .unwrap_err();
    assert!(matches!(err, EngineError::Internal(_)));
}
