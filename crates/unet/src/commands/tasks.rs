//! Task command handlers.

use chrono::{DateTime, Utc};
use tabled::Tabled;

use unet_core::display::{dash, grouped_int, label_or_dash, percent};
use unet_core::{Controller, CreateTaskRequest, Task, TaskPriority};

use crate::cli::{GlobalOpts, PriorityArg, TasksArgs, TasksCommand};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct TaskRow {
    #[tabled(rename = "任务")]
    id: String,
    #[tabled(rename = "物料")]
    material: String,
    #[tabled(rename = "目标设备")]
    target: String,
    #[tabled(rename = "数量")]
    quantity: String,
    #[tabled(rename = "优先级")]
    priority: String,
    #[tabled(rename = "进度")]
    progress: String,
    #[tabled(rename = "状态")]
    status: String,
}

impl From<&Task> for TaskRow {
    fn from(t: &Task) -> Self {
        Self {
            id: t.task_id.clone(),
            material: dash(t.material_code.as_deref()).to_owned(),
            target: dash(t.target_device.as_deref()).to_owned(),
            quantity: t.quantity.map_or_else(|| "--".into(), grouped_int),
            priority: label_or_dash(t.priority.as_ref()),
            progress: percent(t.progress),
            status: label_or_dash(t.status.as_ref()),
        }
    }
}

fn priority(arg: PriorityArg) -> TaskPriority {
    match arg {
        PriorityArg::High => TaskPriority::High,
        PriorityArg::Medium => TaskPriority::Medium,
        PriorityArg::Low => TaskPriority::Low,
    }
}

fn parse_scheduled_at(raw: &str) -> Result<DateTime<Utc>, CliError> {
    DateTime::parse_from_rfc3339(raw.trim())
        .map(|at| at.with_timezone(&Utc))
        .map_err(|e| CliError::validation("scheduled-at", format!("expected RFC 3339: {e}")))
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    controller: &Controller,
    args: TasksArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    util::require_session(controller)?;

    match args.command {
        TasksCommand::List => {
            let tasks = controller.tasks().await?;
            let out = output::render_list(global.output, &tasks, |x| TaskRow::from(x), |t| {
                t.task_id.clone()
            })?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        TasksCommand::Create {
            material,
            device,
            quantity,
            priority: level,
            scheduled_at,
        } => {
            let mut request =
                CreateTaskRequest::new(material, device, quantity).with_priority(priority(level));
            if let Some(ref raw) = scheduled_at {
                request = request.scheduled_at(parse_scheduled_at(raw)?);
            }

            let task = controller.create_task(request).await?;
            output::success(global, "任务创建成功，已进入队列");
            let out = output::render_single(
                global.output,
                &task,
                |t| output::render_table(&[TaskRow::from(t)]),
                |t| t.task_id.clone(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn scheduled_at_accepts_offsets() {
        let at = parse_scheduled_at("2024-06-15T08:00:00+08:00").unwrap();
        assert_eq!(at.to_rfc3339(), "2024-06-15T00:00:00+00:00");
    }

    #[test]
    fn scheduled_at_rejects_dates_without_time() {
        assert!(matches!(
            parse_scheduled_at("2024-06-15"),
            Err(CliError::Validation { .. })
        ));
    }

    #[test]
    fn task_row_uses_labels() {
        let task: Task = serde_json::from_value(serde_json::json!({
            "taskId": "T-7",
            "quantity": 1500,
            "priority": "high",
            "status": "in_progress",
            "progress": 40
        }))
        .unwrap();
        let row = TaskRow::from(&task);
        assert_eq!(row.quantity, "1,500");
        assert_eq!(row.priority, "高");
        assert_eq!(row.status, "执行中");
        assert_eq!(row.progress, "40%");
        assert_eq!(row.material, "--");
    }
}
