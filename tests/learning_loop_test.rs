// ==========================================
// 学习回路集成测试
// ==========================================
// 测试目标: 确认/否决的存储语义 + 反馈事件 + API 入口校验
// 覆盖范围: 计数累积/活动行唯一/槽位释放/事件快照
// ==========================================

use rusqlite::Connection;
use sku_match_engine::api::{ApiError, MappingApi};
use sku_match_engine::domain::mapping::UomConversion;
use sku_match_engine::domain::types::MappingStatus;
use sku_match_engine::engine::events::{
    FeedbackAction, MappingFeedbackEvent, MappingFeedbackPublisher, NoOpFeedbackPublisher,
    OptionalFeedbackPublisher,
};
use sku_match_engine::engine::learning::{ConfirmRequest, LearningLoop};
use sku_match_engine::repository::mapping_repo::{
    ConfirmedMappingRepository, MappingListFilter,
};
use std::error::Error;
use std::sync::{Arc, Mutex};

// ==========================================
// 测试桩实现
// ==========================================

/// 记录型事件发布者: 捕获全部事件供断言
#[derive(Default)]
struct RecordingPublisher {
    events: Mutex<Vec<MappingFeedbackEvent>>,
}

impl RecordingPublisher {
    fn events(&self) -> Vec<MappingFeedbackEvent> {
        self.events.lock().unwrap().clone()
    }
}

impl MappingFeedbackPublisher for RecordingPublisher {
    fn publish(&self, event: MappingFeedbackEvent) -> Result<(), Box<dyn Error + Send + Sync>> {
        self.events.lock().unwrap().push(event);
        Ok(())
    }
}

/// 始终失败的事件发布者
struct FailingPublisher;

impl MappingFeedbackPublisher for FailingPublisher {
    fn publish(&self, _event: MappingFeedbackEvent) -> Result<(), Box<dyn Error + Send + Sync>> {
        Err("下游收集方不可用".into())
    }
}

// ==========================================
// 测试辅助函数
// ==========================================

fn make_repo() -> Arc<ConfirmedMappingRepository> {
    sku_match_engine::logging::init_test();
    let conn = Connection::open_in_memory().unwrap();
    sku_match_engine::db::configure_sqlite_connection(&conn).unwrap();
    sku_match_engine::db::init_engine_schema(&conn).unwrap();
    Arc::new(ConfirmedMappingRepository::new(Arc::new(Mutex::new(conn))))
}

fn make_loop(repo: Arc<ConfirmedMappingRepository>) -> LearningLoop {
    LearningLoop::new(repo, OptionalFeedbackPublisher::none())
}

fn confirm_request(sku_raw: &str, internal_sku: &str) -> ConfirmRequest {
    ConfirmRequest {
        tenant_id: "t1".to_string(),
        customer_id: "c1".to_string(),
        customer_sku_raw: sku_raw.to_string(),
        internal_sku: internal_sku.to_string(),
        uom_conversion: None,
        confirmed_by: Some("op-1".to_string()),
    }
}

// ==========================================
// 确认语义
// ==========================================

#[test]
fn test_first_confirm_creates_confirmed_row() {
    let repo = make_repo();
    let learning = make_loop(repo.clone());

    let mapping = learning.confirm(&confirm_request(" abc-123 ", "PROD-1")).unwrap();

    assert_eq!(mapping.customer_sku_norm, "ABC-123");
    assert_eq!(mapping.internal_sku, "PROD-1");
    assert_eq!(mapping.status, MappingStatus::Confirmed);
    assert_eq!(mapping.confidence, 1.0);
    assert_eq!(mapping.support_count, 1);
    assert_eq!(mapping.reject_count, 0);
    assert_eq!(mapping.created_by.as_deref(), Some("op-1"));

    // 匹配路径的短路查找用同一规范化键可命中
    let found = repo.lookup("t1", "c1", "ABC-123").unwrap();
    assert!(found.is_some());
}

#[test]
fn test_repeated_confirm_accumulates_support_count() {
    let repo = make_repo();
    let learning = make_loop(repo.clone());

    for _ in 0..3 {
        learning.confirm(&confirm_request("abc-123", "PROD-1")).unwrap();
    }

    let mapping = repo.lookup("t1", "c1", "ABC-123").unwrap().unwrap();
    assert_eq!(mapping.support_count, 3);

    // 键下活动行仍然只有一条
    assert_eq!(repo.count_active("t1", "c1", "ABC-123").unwrap(), 1);
}

#[test]
fn test_confirm_different_sku_overwrites_target() {
    let repo = make_repo();
    let learning = make_loop(repo.clone());

    learning.confirm(&confirm_request("abc-123", "PROD-1")).unwrap();
    let mapping = learning.confirm(&confirm_request("abc-123", "PROD-2")).unwrap();

    // 最后写入者胜出, 计数继续累积
    assert_eq!(mapping.internal_sku, "PROD-2");
    assert_eq!(mapping.support_count, 2);
    assert_eq!(repo.count_active("t1", "c1", "ABC-123").unwrap(), 1);
}

#[test]
fn test_confirm_with_uom_conversion_persists() {
    let repo = make_repo();
    let learning = make_loop(repo.clone());

    let mut request = confirm_request("abc-123", "PROD-1");
    request.uom_conversion = Some(UomConversion {
        uom_from: "ctn".to_string(),
        uom_to: "pcs".to_string(),
        pack_factor: 24.0,
    });
    learning.confirm(&request).unwrap();

    let mapping = repo.lookup("t1", "c1", "ABC-123").unwrap().unwrap();
    let conversion = mapping.uom_conversion.unwrap();
    assert_eq!(conversion.uom_from, "ctn");
    assert_eq!(conversion.uom_to, "pcs");
    assert_eq!(conversion.pack_factor, 24.0);
}

// ==========================================
// 否决语义
// ==========================================

#[test]
fn test_reject_frees_active_slot() {
    let repo = make_repo();
    let learning = make_loop(repo.clone());

    learning.confirm(&confirm_request("abc-123", "PROD-1")).unwrap();
    learning.reject("t1", "c1", "abc-123", "PROD-1").unwrap();

    // 短路查找不再命中, 活动槽位释放
    assert!(repo.lookup("t1", "c1", "ABC-123").unwrap().is_none());
    assert_eq!(repo.count_active("t1", "c1", "ABC-123").unwrap(), 0);

    // 同键可确认另一内部SKU
    let mapping = learning.confirm(&confirm_request("abc-123", "PROD-2")).unwrap();
    assert_eq!(mapping.internal_sku, "PROD-2");
    assert_eq!(mapping.support_count, 1);
}

#[test]
fn test_reject_missing_row_is_noop() {
    let repo = make_repo();
    let learning = make_loop(repo.clone());

    learning.reject("t1", "c1", "no-such-sku", "PROD-1").unwrap();
    assert_eq!(repo.count_active("t1", "c1", "NO-SUCH-SKU").unwrap(), 0);
}

// ==========================================
// 反馈事件
// ==========================================

#[test]
fn test_feedback_events_carry_before_after_snapshots() {
    let repo = make_repo();
    let publisher = Arc::new(RecordingPublisher::default());
    let learning = LearningLoop::new(
        repo,
        OptionalFeedbackPublisher::with_publisher(publisher.clone()),
    );

    learning.confirm(&confirm_request("abc-123", "PROD-1")).unwrap();
    learning.confirm(&confirm_request("abc-123", "PROD-1")).unwrap();
    learning.reject("t1", "c1", "abc-123", "PROD-1").unwrap();

    let events = publisher.events();
    assert_eq!(events.len(), 3);

    // 首次确认: 无前像
    assert_eq!(events[0].action, FeedbackAction::Confirmed);
    assert_eq!(events[0].customer_sku_norm, "ABC-123");
    assert!(events[0].before.is_none());
    assert_eq!(events[0].after.as_ref().unwrap().support_count, 1);

    // 再次确认: 前后像计数递增
    assert_eq!(events[1].action, FeedbackAction::Confirmed);
    assert_eq!(events[1].before.as_ref().unwrap().support_count, 1);
    assert_eq!(events[1].after.as_ref().unwrap().support_count, 2);

    // 否决: 活动行消失, 后像为空
    assert_eq!(events[2].action, FeedbackAction::Rejected);
    assert_eq!(events[2].before.as_ref().unwrap().support_count, 2);
    assert!(events[2].after.is_none());
}

#[test]
fn test_feedback_event_serialization_shape() {
    // 下游收集方按字符串形态消费: 动作 snake_case, 状态 SCREAMING_SNAKE_CASE
    let repo = make_repo();
    let publisher = Arc::new(RecordingPublisher::default());
    let learning = LearningLoop::new(
        repo,
        OptionalFeedbackPublisher::with_publisher(publisher.clone()),
    );

    learning.confirm(&confirm_request("abc-123", "PROD-1")).unwrap();

    let events = publisher.events();
    let json = serde_json::to_value(&events[0]).unwrap();
    assert_eq!(json["action"], "confirmed");
    assert_eq!(json["customer_sku_norm"], "ABC-123");
    assert_eq!(json["after"]["status"], "CONFIRMED");
    assert!(json["before"].is_null());
}

#[test]
fn test_publish_failure_does_not_fail_confirm() {
    let repo = make_repo();
    let learning = LearningLoop::new(
        repo.clone(),
        OptionalFeedbackPublisher::with_publisher(Arc::new(FailingPublisher)),
    );

    let mapping = learning.confirm(&confirm_request("abc-123", "PROD-1")).unwrap();
    assert_eq!(mapping.support_count, 1);
    assert!(repo.lookup("t1", "c1", "ABC-123").unwrap().is_some());
}

// ==========================================
// 持久化
// ==========================================

#[test]
fn test_mappings_survive_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("engine.db");
    let db_path = db_path.to_str().unwrap();

    {
        let conn = sku_match_engine::db::open_sqlite_connection(db_path).unwrap();
        sku_match_engine::db::init_engine_schema(&conn).unwrap();
        let repo = Arc::new(ConfirmedMappingRepository::new(Arc::new(Mutex::new(conn))));
        let learning = LearningLoop::new(
            repo,
            OptionalFeedbackPublisher::with_publisher(Arc::new(NoOpFeedbackPublisher)),
        );
        learning.confirm(&confirm_request("abc-123", "PROD-1")).unwrap();
    }

    // 重新打开数据库, 确认映射仍然可查
    let conn = sku_match_engine::db::open_sqlite_connection(db_path).unwrap();
    sku_match_engine::db::init_engine_schema(&conn).unwrap();
    let repo = ConfirmedMappingRepository::new(Arc::new(Mutex::new(conn)));

    let mapping = repo.lookup("t1", "c1", "ABC-123").unwrap().unwrap();
    assert_eq!(mapping.internal_sku, "PROD-1");
    assert_eq!(mapping.status, MappingStatus::Confirmed);
}

// ==========================================
// API 入口
// ==========================================

#[test]
fn test_mapping_api_confirm_and_list() {
    let repo = make_repo();
    let learning = Arc::new(make_loop(repo.clone()));
    let api = MappingApi::new(learning, repo);

    api.confirm_mapping(
        "t1", "c1", "abc-123", "PROD-1", None, None, None, Some("op-1"),
    )
    .unwrap();
    api.confirm_mapping(
        "t1", "c1", "xyz-789", "PROD-2", None, None, None, Some("op-1"),
    )
    .unwrap();

    let page = api
        .list_mappings("t1", MappingListFilter::default(), 1, 10)
        .unwrap();
    assert_eq!(page.total, 2);
    assert_eq!(page.items.len(), 2);
    assert_eq!(page.page, 1);

    // 状态过滤
    let filter = MappingListFilter {
        status: Some(MappingStatus::Rejected),
        ..MappingListFilter::default()
    };
    let page = api.list_mappings("t1", filter, 1, 10).unwrap();
    assert_eq!(page.total, 0);
}

#[test]
fn test_mapping_api_rejects_partial_uom_triple() {
    let repo = make_repo();
    let learning = Arc::new(make_loop(repo.clone()));
    let api = MappingApi::new(learning, repo);

    let err = api
        .confirm_mapping(
            "t1", "c1", "abc-123", "PROD-1", Some("ctn"), None, None, None,
        )
        .unwrap_err();
    assert!(matches!(err, ApiError::InvalidInput(_)));
}

#[test]
fn test_mapping_api_reject_flow() {
    let repo = make_repo();
    let learning = Arc::new(make_loop(repo.clone()));
    let api = MappingApi::new(learning, repo.clone());

    api.confirm_mapping(
        "t1", "c1", "abc-123", "PROD-1", None, None, None, None,
    )
    .unwrap();
    api.reject_mapping("t1", "c1", "abc-123", "PROD-1").unwrap();

    assert!(repo.lookup("t1", "c1", "ABC-123").unwrap().is_none());
}

#[test]
fn test_mapping_api_paging_bounds() {
    let repo = make_repo();
    let learning = Arc::new(make_loop(repo.clone()));
    let api = MappingApi::new(learning, repo);

    let err = api
        .list_mappings("t1", MappingListFilter::default(), 0, 10)
        .unwrap_err();
    assert!(matches!(err, ApiError::InvalidInput(_)));

    let err = api
        .list_mappings("t1", MappingListFilter::default(), 1, 0)
        .unwrap_err();
    assert!(matches!(err, ApiError::InvalidInput(_)));
}
