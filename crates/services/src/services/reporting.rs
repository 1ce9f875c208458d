//! Dashboard aggregations, computed in SQL instead of client-side.

use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};
use ts_rs::TS;

#[derive(Debug, Clone, FromRow, Serialize, Deserialize, TS)]
pub struct StatusCount {
    pub status: String,
    pub count: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct DashboardSummary {
    pub projects_by_status: Vec<StatusCount>,
    pub tasks_by_status: Vec<StatusCount>,
    pub total_projects: i64,
    pub total_clients: i64,
    pub total_managers: i64,
    pub total_budget: f64,
    pub active_budget: f64,
    pub overdue_tasks: i64,
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize, TS)]
pub struct DepartmentLoad {
    pub department: String,
    pub projects: i64,
    pub budget: f64,
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize, TS)]
pub struct ManagerWorkload {
    pub manager: String,
    pub open_tasks: i64,
}

pub struct ReportingService;

impl ReportingService {
    pub async fn dashboard_summary(pool: &SqlitePool) -> Result<DashboardSummary, sqlx::Error> {
        let projects_by_status = sqlx::query_as::<_, StatusCount>(
            "SELECT status, COUNT(*) AS count FROM projects GROUP BY status ORDER BY status",
        )
        .fetch_all(pool)
        .await?;

        let tasks_by_status = sqlx::query_as::<_, StatusCount>(
            "SELECT status, COUNT(*) AS count FROM tasks GROUP BY status ORDER BY status",
        )
        .fetch_all(pool)
        .await?;

        let (total_projects,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM projects")
            .fetch_one(pool)
            .await?;
        let (total_clients,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM clients")
            .fetch_one(pool)
            .await?;
        let (total_managers,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM managers")
            .fetch_one(pool)
            .await?;

        let (total_budget,): (f64,) =
            sqlx::query_as("SELECT COALESCE(SUM(budget), 0.0) FROM projects")
                .fetch_one(pool)
                .await?;
        let (active_budget,): (f64,) = sqlx::query_as(
            "SELECT COALESCE(SUM(budget), 0.0) FROM projects WHERE status = 'active'",
        )
        .fetch_one(pool)
        .await?;

        let (overdue_tasks,): (i64,) = sqlx::query_as(
            r#"SELECT COUNT(*) FROM tasks
               WHERE due_date IS NOT NULL
                 AND due_date < date('now')
                 AND status NOT IN ('done', 'cancelled')"#,
        )
        .fetch_one(pool)
        .await?;

        Ok(DashboardSummary {
            projects_by_status,
            tasks_by_status,
            total_projects,
            total_clients,
            total_managers,
            total_budget,
            active_budget,
            overdue_tasks,
        })
    }

    pub async fn projects_by_department(
        pool: &SqlitePool,
    ) -> Result<Vec<DepartmentLoad>, sqlx::Error> {
        sqlx::query_as::<_, DepartmentLoad>(
            r#"SELECT d.name AS department,
                      COUNT(p.id) AS projects,
                      COALESCE(SUM(p.budget), 0.0) AS budget
               FROM departments d
               LEFT JOIN projects p ON p.department_id = d.id
               GROUP BY d.id
               ORDER BY d.name"#,
        )
        .fetch_all(pool)
        .await
    }

    pub async fn workload_by_manager(
        pool: &SqlitePool,
    ) -> Result<Vec<ManagerWorkload>, sqlx::Error> {
        sqlx::query_as::<_, ManagerWorkload>(
            r#"SELECT m.name AS manager,
                      COUNT(t.id) AS open_tasks
               FROM managers m
               LEFT JOIN tasks t
                 ON t.assignee_id = m.id
                AND t.status IN ('todo', 'inprogress', 'inreview')
               GROUP BY m.id
               ORDER BY open_tasks DESC, m.name"#,
        )
        .fetch_all(pool)
        .await
    }
}

#[cfg(test)]
mod tests {
    use db::{
        DBService,
        models::{
            department::{CreateDepartment, Department},
            manager::{CreateManager, Manager},
            project::{CreateProject, Project, ProjectStatus},
            task::{CreateTask, Task},
        },
    };

    use super::*;

    #[tokio::test]
    async fn summary_counts_and_budgets() {
        let db = DBService::new_in_memory().await.unwrap();

        let dept = Department::create(
            &db.pool,
            &CreateDepartment { name: "Design".to_string() },
        )
        .await
        .unwrap();

        for (name, status, budget) in [
            ("A", ProjectStatus::Active, 100.0),
            ("B", ProjectStatus::Active, 250.0),
            ("C", ProjectStatus::Planning, 40.0),
        ] {
            Project::create(
                &db.pool,
                &CreateProject {
                    name: name.to_string(),
                    description: None,
                    client_id: None,
                    manager_id: None,
                    department_id: Some(dept.id),
                    status: Some(status),
                    phase: None,
                    budget: Some(budget),
                    start_date: None,
                    end_date: None,
                },
            )
            .await
            .unwrap();
        }

        let summary = ReportingService::dashboard_summary(&db.pool).await.unwrap();
        assert_eq!(summary.total_projects, 3);
        assert_eq!(summary.total_budget, 390.0);
        assert_eq!(summary.active_budget, 350.0);

        let active = summary
            .projects_by_status
            .iter()
            .find(|s| s.status == "active")
            .unwrap();
        assert_eq!(active.count, 2);

        let by_dept = ReportingService::projects_by_department(&db.pool).await.unwrap();
        assert_eq!(by_dept.len(), 1);
        assert_eq!(by_dept[0].projects, 3);
        assert_eq!(by_dept[0].budget, 390.0);
    }

    #[tokio::test]
    async fn workload_counts_only_open_tasks() {
        let db = DBService::new_in_memory().await.unwrap();

        let manager = Manager::create(
            &db.pool,
            &CreateManager {
                name: "Beth".to_string(),
                email: "beth@example.com".to_string(),
                phone: None,
                department_id: None,
                role: None,
            },
        )
        .await
        .unwrap();

        let project = Project::create(
            &db.pool,
            &CreateProject {
                name: "P".to_string(),
                description: None,
                client_id: None,
                manager_id: Some(manager.id),
                department_id: None,
                status: None,
                phase: None,
                budget: None,
                start_date: None,
                end_date: None,
            },
        )
        .await
        .unwrap();

        for (title, status) in [
            ("open", db::models::task::TaskStatus::Todo),
            ("done", db::models::task::TaskStatus::Done),
        ] {
            Task::create(
                &db.pool,
                project.id,
                &CreateTask {
                    title: title.to_string(),
                    description: None,
                    status: Some(status),
                    priority: None,
                    assignee_id: Some(manager.id),
                    due_date: None,
                },
            )
            .await
            .unwrap();
        }

        let workload = ReportingService::workload_by_manager(&db.pool).await.unwrap();
        assert_eq!(workload.len(), 1);
        assert_eq!(workload[0].open_tasks, 1);
    }
}
