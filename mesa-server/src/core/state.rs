use std::sync::Arc;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;
use tokio_util::sync::CancellationToken;

use crate::auth::{JwtService, LoginThrottle};
use crate::core::Config;
use crate::core::tasks;
use crate::db::DbService;
use crate::notifications::{HttpPushGateway, NoopPushGateway, NotificationDispatcher, PushGateway};
use crate::reservations::ReservationManager;

/// 服务器状态 - 持有所有服务的共享引用
///
/// ServerState 是整个服务的核心数据结构。使用 Arc 实现浅拷贝，
/// 所有权成本极低。
///
/// # 服务组件
///
/// | 字段 | 类型 | 说明 |
/// |------|------|------|
/// | config | Config | 配置项 (不可变) |
/// | db | Surreal<Db> | 嵌入式数据库 |
/// | jwt_service | Arc<JwtService> | JWT 认证服务 |
/// | dispatcher | Arc<NotificationDispatcher> | 通知扇出 |
/// | login_throttle | Arc<LoginThrottle> | 登录失败限流 |
/// | shutdown | CancellationToken | 后台任务取消信号 |
#[derive(Clone)]
pub struct ServerState {
    /// 服务器配置
    pub config: Config,
    /// 嵌入式数据库 (SurrealDB)
    pub db: Surreal<Db>,
    /// JWT 认证服务 (Arc 共享所有权)
    pub jwt_service: Arc<JwtService>,
    /// 通知扇出服务
    pub dispatcher: Arc<NotificationDispatcher>,
    /// 登录失败限流
    pub login_throttle: Arc<LoginThrottle>,
    /// 后台任务取消信号
    pub shutdown: CancellationToken,
}

impl ServerState {
    /// 初始化服务器状态
    ///
    /// 按顺序初始化：
    /// 1. 工作目录结构
    /// 2. 数据库 (work_dir/database/mesa.db) + schema + 默认管理员
    /// 3. JWT / 通知 / 限流服务
    ///
    /// # Panics
    ///
    /// 数据库初始化失败时 panic
    pub async fn initialize(config: &Config) -> Self {
        config
            .ensure_work_dir_structure()
            .expect("Failed to create work directory structure");

        let db_path = config.database_dir().join("mesa.db");
        let db_service = DbService::new(&db_path.to_string_lossy())
            .await
            .expect("Failed to initialize database");
        db_service
            .ensure_default_admin()
            .await
            .expect("Failed to seed default admin");

        Self::with_db(config.clone(), db_service.db)
    }

    /// 用已就绪的数据库构造状态 (测试用内存库走这里)
    pub fn with_db(config: Config, db: Surreal<Db>) -> Self {
        let gateway: Arc<dyn PushGateway> = match &config.push_relay_url {
            Some(url) => Arc::new(HttpPushGateway::new(url.clone())),
            None => Arc::new(NoopPushGateway),
        };
        let dispatcher = Arc::new(NotificationDispatcher::new(db.clone(), gateway));
        let jwt_service = Arc::new(JwtService::with_config(config.jwt.clone()));

        Self {
            config,
            db,
            jwt_service,
            dispatcher,
            login_throttle: Arc::new(LoginThrottle::new()),
            shutdown: CancellationToken::new(),
        }
    }

    /// 启动后台任务
    ///
    /// 必须在 `Server::run()` 之前调用
    ///
    /// 启动的任务：
    /// - 过期刷新令牌清理
    pub fn start_background_tasks(&self) {
        let _ = tasks::spawn_refresh_token_purge(self.db.clone(), self.shutdown.clone());
    }

    /// 获取数据库实例
    pub fn get_db(&self) -> Surreal<Db> {
        self.db.clone()
    }

    /// 获取 JWT 服务
    pub fn get_jwt_service(&self) -> Arc<JwtService> {
        self.jwt_service.clone()
    }

    /// 预订生命周期管理器 (按请求构造，内部只持共享引用)
    pub fn reservation_manager(&self) -> ReservationManager {
        ReservationManager::new(self.db.clone(), self.dispatcher.clone())
    }

    /// 通知后台任务停止
    pub fn trigger_shutdown(&self) {
        self.shutdown.cancel();
    }
}
