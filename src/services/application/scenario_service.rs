//! 演示场景服务：同一时间最多一个场景处于激活状态

use sea_orm::sea_query::Expr;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set, TransactionTrait};
use crate::models::entities::{demo_scenarios, DemoScenario};
use crate::services::infrastructure::database::DatabaseHandle;
use crate::utils::error::{AppError, AppResult};
use super::persistence;

#[derive(Clone)]
pub struct ScenarioService {
    db: DatabaseHandle,
}

impl ScenarioService {
    pub fn new(db: DatabaseHandle) -> Self {
        Self { db }
    }

    pub async fn list(&self) -> AppResult<Vec<DemoScenario>> {
        let Some(conn) = self.db.connection() else {
            return Ok(Vec::new());
        };
        demo_scenarios::Entity::find()
            .order_by_asc(demo_scenarios::Column::Name)
            .all(conn)
            .await
            .map_err(persistence("加载演示场景失败"))
    }

    /// 激活指定场景，其余场景全部取消激活
    pub async fn activate(&self, id: i32) -> AppResult<DemoScenario> {
        let conn = self.db.require()?;
        let txn = conn.begin().await.map_err(persistence("开启事务失败"))?;

        let scenario = demo_scenarios::Entity::find_by_id(id)
            .one(&txn)
            .await
            .map_err(persistence("加载演示场景失败"))?
            .ok_or_else(|| AppError::not_found_error("DemoScenario", "Scenario not found"))?;

        demo_scenarios::Entity::update_many()
            .col_expr(demo_scenarios::Column::IsActive, Expr::value(false))
            .filter(demo_scenarios::Column::Id.ne(id))
            .exec(&txn)
            .await
            .map_err(persistence("取消激活演示场景失败"))?;

        let mut active: demo_scenarios::ActiveModel = scenario.into();
        active.is_active = Set(true);
        let activated = active.update(&txn).await.map_err(persistence("激活演示场景失败"))?;

        txn.commit().await.map_err(persistence("提交事务失败"))?;
        crate::log_user_operation!("演示场景已激活: {}", activated.name);
        Ok(activated)
    }
}
