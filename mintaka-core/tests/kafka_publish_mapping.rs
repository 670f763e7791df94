use std::sync::atomic::{AtomicU32, Ordering};

use mintaka_common::prelude::*;
use mintaka_common::{TaskDef, WorkflowDef};
use mintaka_core::{IdGenerator, MetadataDao, TaskMapperRegistry, TaskStatus, WorkflowModel};

struct SeqIdGenerator(AtomicU32);

impl IdGenerator for SeqIdGenerator {
    fn generate(&self) -> InlineStr {
        let n = self.0.fetch_add(1, Ordering::Relaxed);
        InlineStr::from(format!("kafka-task-{}", n).as_str())
    }
}

fn init_logger() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug"))
        .is_test(true)
        .try_init();
}

fn kafka_workflow(task_name: &str) -> WorkflowModel {
    let workflow_def = format!(
        r#"
    {{
        "name": "kafka_wf",
        "tasks": [
            {{
                "name": "{}",
                "taskReferenceName": "publish_to_kafka",
                "type": "KAFKA_PUBLISH",
                "inputParameters": {{
                    "kafka_request": {{
                        "topic": "test_topic",
                        "value": "message"
                    }}
                }}
            }}
        ]
    }}"#,
        task_name
    );
    let workflow_def: serde_json::Value =
        serde_json::from_str(&workflow_def).expect("parse json failed");
    let workflow_def = WorkflowDef::try_from(&workflow_def).expect("parse WorkflowDef failed");
    WorkflowModel::new("kafka-wf-1".into(), workflow_def)
}

#[test]
fn kafka_publish_maps_to_single_unit() {
    init_logger();

    let workflow = kafka_workflow("kafka_task_registered");
    let task_def = r#"
    {
        "name": "kafka_task_registered",
        "responseTimeoutSeconds": 120
    }"#;
    let task_def: serde_json::Value = serde_json::from_str(task_def).expect("parse json failed");
    let task_def = TaskDef::try_from(&task_def).expect("parse TaskDef failed");
    MetadataDao::create_task_def(task_def);

    let id_generator = SeqIdGenerator(AtomicU32::new(0));
    let tasks = TaskMapperRegistry::get_tasks_to_be_scheduled(
        &workflow,
        &workflow.workflow_definition.tasks[0],
        0,
        &InlineStr::new(),
        &id_generator,
    )
    .expect("mapping failed");

    assert_eq!(tasks.len(), 1);
    let task = &tasks[0];
    assert_eq!(task.task_type, "KAFKA_PUBLISH");
    assert_eq!(task.status, TaskStatus::Scheduled);
    assert_eq!(task.response_timeout_seconds, 120);
    match task.input_data.get("kafka_request") {
        Some(Object::Map(request)) => {
            assert_eq!(
                request.get("topic"),
                Some(&Object::String("test_topic".into()))
            );
        }
        other => panic!("kafka_request missing or not a map: {:?}", other),
    }
}

#[test]
fn kafka_publish_inherits_isolation_from_definition() {
    init_logger();

    let workflow = kafka_workflow("kafka_task_isolated");
    let task_def = r#"
    {
        "name": "kafka_task_isolated",
        "executionNameSpace": "testExecutionNameSpace",
        "isolationGroupId": "testIsolationGroupId"
    }"#;
    let task_def: serde_json::Value = serde_json::from_str(task_def).expect("parse json failed");
    let task_def = TaskDef::try_from(&task_def).expect("parse TaskDef failed");
    MetadataDao::create_task_def(task_def);

    let id_generator = SeqIdGenerator(AtomicU32::new(0));
    let tasks = TaskMapperRegistry::get_tasks_to_be_scheduled(
        &workflow,
        &workflow.workflow_definition.tasks[0],
        0,
        &InlineStr::new(),
        &id_generator,
    )
    .expect("mapping failed");

    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].execution_name_space, "testExecutionNameSpace");
    assert_eq!(tasks[0].isolation_group_id, "testIsolationGroupId");
}

#[test]
fn kafka_publish_without_definition_leaves_isolation_empty() {
    init_logger();

    let workflow = kafka_workflow("kafka_task_unregistered");
    let id_generator = SeqIdGenerator(AtomicU32::new(0));

    let tasks = TaskMapperRegistry::get_tasks_to_be_scheduled(
        &workflow,
        &workflow.workflow_definition.tasks[0],
        0,
        &InlineStr::new(),
        &id_generator,
    )
    .expect("mapping failed");

    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].task_type, "KAFKA_PUBLISH");
    assert!(tasks[0].execution_name_space.is_empty());
    assert!(tasks[0].isolation_group_id.is_empty());
    // no registered definition, the default response timeout applies
    assert_eq!(tasks[0].response_timeout_seconds, 3600);
}
