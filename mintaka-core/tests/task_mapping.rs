use std::sync::atomic::{AtomicU32, Ordering};

use mintaka_common::prelude::*;
use mintaka_common::{TaskDef, WorkflowDef};
use mintaka_core::{
    IdGenerator, MetadataDao, TaskMapperRegistry, TaskStatus, WorkflowModel,
};

/// Deterministic identifiers so unit fields can be compared across runs.
struct SeqIdGenerator(AtomicU32);

impl SeqIdGenerator {
    fn new() -> Self {
        Self(AtomicU32::new(0))
    }
}

impl IdGenerator for SeqIdGenerator {
    fn generate(&self) -> InlineStr {
        let n = self.0.fetch_add(1, Ordering::Relaxed);
        InlineStr::from(format!("task-{}", n).as_str())
    }
}

fn init_logger() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug"))
        .is_test(true)
        .try_init();
}

fn workflow_from_json(workflow_def: &str) -> WorkflowModel {
    let workflow_def: serde_json::Value =
        serde_json::from_str(workflow_def).expect("parse json failed");
    let workflow_def =
        WorkflowDef::try_from(&workflow_def).expect("parse WorkflowDef failed");
    WorkflowModel::new("wf-instance-1".into(), workflow_def)
}

#[test]
fn simple_task_maps_to_single_unit() {
    init_logger();

    let workflow = workflow_from_json(
        r#"
    {
        "name": "simple_wf",
        "tasks": [
            {
                "name": "encode_unregistered",
                "taskReferenceName": "encode",
                "type": "SIMPLE",
                "inputParameters": { "a": 1 }
            }
        ]
    }"#,
    );
    let id_generator = SeqIdGenerator::new();

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
    assert_eq!(task.task_type, "SIMPLE");
    assert_eq!(task.reference_task_name, "encode");
    assert_eq!(task.status, TaskStatus::Scheduled);
    assert_eq!(task.workflow_instance_id, "wf-instance-1");
    assert_eq!(task.input_data.get("a"), Some(&Object::Int(1)));
    assert!(task.isolation_group_id.is_empty());
    assert!(task.execution_name_space.is_empty());
}

#[test]
fn simple_task_inherits_isolation_from_definition() {
    init_logger();

    let task_def = r#"
    {
        "name": "encode_registered",
        "isolationGroupId": "groupB",
        "executionNameSpace": "nsA"
    }"#;
    let task_def: serde_json::Value = serde_json::from_str(task_def).expect("parse json failed");
    let task_def = TaskDef::try_from(&task_def).expect("parse TaskDef failed");
    MetadataDao::create_task_def(task_def);

    let workflow = workflow_from_json(
        r#"
    {
        "name": "simple_wf",
        "tasks": [
            {
                "name": "encode_registered",
                "taskReferenceName": "encode",
                "type": "SIMPLE",
                "inputParameters": { "a": 1 }
            }
        ]
    }"#,
    );
    let id_generator = SeqIdGenerator::new();

    let tasks = TaskMapperRegistry::get_tasks_to_be_scheduled(
        &workflow,
        &workflow.workflow_definition.tasks[0],
        0,
        &InlineStr::new(),
        &id_generator,
    )
    .expect("mapping failed");

    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].execution_name_space, "nsA");
    assert_eq!(tasks[0].isolation_group_id, "groupB");
}

#[test]
fn removed_definition_is_no_longer_inherited() {
    init_logger();

    let task_def = r#"
    {
        "name": "encode_removable",
        "isolationGroupId": "groupC"
    }"#;
    let task_def: serde_json::Value = serde_json::from_str(task_def).expect("parse json failed");
    let task_def = TaskDef::try_from(&task_def).expect("parse TaskDef failed");
    MetadataDao::create_task_def(task_def);

    let workflow = workflow_from_json(
        r#"
    {
        "name": "simple_wf",
        "tasks": [
            {
                "name": "encode_removable",
                "taskReferenceName": "encode",
                "type": "SIMPLE"
            }
        ]
    }"#,
    );
    let id_generator = SeqIdGenerator::new();

    let tasks = TaskMapperRegistry::get_tasks_to_be_scheduled(
        &workflow,
        &workflow.workflow_definition.tasks[0],
        0,
        &InlineStr::new(),
        &id_generator,
    )
    .expect("mapping failed");
    assert_eq!(tasks[0].isolation_group_id, "groupC");

    MetadataDao::remove_task_def(&"encode_removable".into()).expect("remove failed");

    let tasks = TaskMapperRegistry::get_tasks_to_be_scheduled(
        &workflow,
        &workflow.workflow_definition.tasks[0],
        0,
        &InlineStr::new(),
        &id_generator,
    )
    .expect("mapping failed");
    assert!(tasks[0].isolation_group_id.is_empty());

    // a second removal is a hard not-found
    let err = MetadataDao::remove_task_def(&"encode_removable".into())
        .expect_err("removing twice should fail");
    assert_eq!(err.code(), 1003);
}

#[test]
fn fork_join_maps_one_unit_per_branch() {
    init_logger();

    let workflow = workflow_from_json(
        r#"
    {
        "name": "fork_wf",
        "tasks": [
            {
                "name": "fanout",
                "taskReferenceName": "fanout",
                "type": "FORK_JOIN",
                "forkTasks": [
                    [ { "name": "x_task", "taskReferenceName": "x", "type": "SIMPLE" } ],
                    [ { "name": "y_task", "taskReferenceName": "y", "type": "SIMPLE" } ],
                    [ { "name": "z_task", "taskReferenceName": "z", "type": "SIMPLE" } ]
                ]
            },
            {
                "name": "fanin",
                "taskReferenceName": "fanin",
                "type": "JOIN",
                "joinOn": ["x", "y", "z"]
            }
        ]
    }"#,
    );
    let id_generator = SeqIdGenerator::new();

    let tasks = TaskMapperRegistry::get_tasks_to_be_scheduled(
        &workflow,
        &workflow.workflow_definition.tasks[0],
        0,
        &InlineStr::new(),
        &id_generator,
    )
    .expect("mapping failed");

    assert_eq!(tasks.len(), 3);
    let ref_names: Vec<&str> = tasks
        .iter()
        .map(|x| x.reference_task_name.as_str())
        .collect();
    assert_eq!(ref_names, vec!["x", "y", "z"]);
    assert!(!tasks[0].fork_task_id.is_empty());
    assert!(tasks
        .iter()
        .all(|x| x.fork_task_id == tasks[0].fork_task_id));
}

#[test]
fn fork_join_without_following_join_fails() {
    init_logger();

    let workflow = workflow_from_json(
        r#"
    {
        "name": "fork_wf_no_join",
        "tasks": [
            {
                "name": "fanout",
                "taskReferenceName": "fanout",
                "type": "FORK_JOIN",
                "forkTasks": [
                    [ { "name": "x_task", "taskReferenceName": "x", "type": "SIMPLE" } ]
                ]
            }
        ]
    }"#,
    );
    let id_generator = SeqIdGenerator::new();

    let result = TaskMapperRegistry::get_tasks_to_be_scheduled(
        &workflow,
        &workflow.workflow_definition.tasks[0],
        0,
        &InlineStr::new(),
        &id_generator,
    );
    assert_eq!(
        result.expect_err("mapping should fail").code(),
        ErrorCode::TERMINATE_WORKFLOW_CODE
    );
}

#[test]
fn dynamic_fork_with_zero_children_fails() {
    init_logger();

    let workflow = workflow_from_json(
        r#"
    {
        "name": "dyn_fork_wf",
        "tasks": [
            {
                "name": "dyn_fanout",
                "taskReferenceName": "dyn_fanout",
                "type": "FORK_JOIN_DYNAMIC",
                "dynamicForkTasksParam": "dynamicTasks",
                "dynamicForkTasksInputParamName": "dynamicTasksInput",
                "inputParameters": {
                    "dynamicTasks": [],
                    "dynamicTasksInput": {}
                }
            }
        ]
    }"#,
    );
    let id_generator = SeqIdGenerator::new();

    let result = TaskMapperRegistry::get_tasks_to_be_scheduled(
        &workflow,
        &workflow.workflow_definition.tasks[0],
        0,
        &InlineStr::new(),
        &id_generator,
    );
    assert_eq!(
        result.expect_err("mapping should fail").code(),
        ErrorCode::TERMINATE_WORKFLOW_CODE
    );
}

#[test]
fn dynamic_fork_maps_children_in_input_order() {
    init_logger();

    let workflow = workflow_from_json(
        r#"
    {
        "name": "dyn_fork_wf",
        "tasks": [
            {
                "name": "dyn_fanout",
                "taskReferenceName": "dyn_fanout",
                "type": "FORK_JOIN_DYNAMIC",
                "dynamicForkTasksParam": "dynamicTasks",
                "dynamicForkTasksInputParamName": "dynamicTasksInput",
                "inputParameters": {
                    "dynamicTasks": [
                        { "name": "child_task", "taskReferenceName": "child_0", "type": "SIMPLE" },
                        { "name": "child_task", "taskReferenceName": "child_1", "type": "SIMPLE" }
                    ],
                    "dynamicTasksInput": {
                        "child_0": { "chunk": 0 },
                        "child_1": { "chunk": 1 }
                    }
                }
            }
        ]
    }"#,
    );
    let id_generator = SeqIdGenerator::new();

    let tasks = TaskMapperRegistry::get_tasks_to_be_scheduled(
        &workflow,
        &workflow.workflow_definition.tasks[0],
        0,
        &InlineStr::new(),
        &id_generator,
    )
    .expect("mapping failed");

    assert_eq!(tasks.len(), 2);
    assert_eq!(tasks[0].reference_task_name, "child_0");
    assert_eq!(tasks[0].seq, 0);
    assert_eq!(tasks[0].input_data.get("chunk"), Some(&Object::Int(0)));
    assert_eq!(tasks[1].reference_task_name, "child_1");
    assert_eq!(tasks[1].seq, 1);
    assert_eq!(tasks[1].input_data.get("chunk"), Some(&Object::Int(1)));
    assert_eq!(tasks[0].fork_task_id, tasks[1].fork_task_id);
}

#[test]
fn switch_selects_matching_case() {
    init_logger();

    let workflow = workflow_from_json(
        r#"
    {
        "name": "switch_wf",
        "tasks": [
            {
                "name": "switch_by_service",
                "taskReferenceName": "switch_by_service",
                "type": "SWITCH",
                "evaluatorType": "value-param",
                "expression": "switchCaseValue",
                "inputParameters": { "switchCaseValue": "fedex" },
                "decisionCases": {
                    "fedex": [
                        { "name": "ship_fedex", "taskReferenceName": "ship_fedex", "type": "SIMPLE" }
                    ],
                    "ups": [
                        { "name": "ship_ups", "taskReferenceName": "ship_ups", "type": "SIMPLE" }
                    ]
                }
            }
        ]
    }"#,
    );
    let id_generator = SeqIdGenerator::new();

    let tasks = TaskMapperRegistry::get_tasks_to_be_scheduled(
        &workflow,
        &workflow.workflow_definition.tasks[0],
        0,
        &InlineStr::new(),
        &id_generator,
    )
    .expect("mapping failed");

    assert_eq!(tasks.len(), 2);
    assert_eq!(tasks[0].task_type, "SWITCH");
    assert_eq!(
        tasks[0].input_data.get("case"),
        Some(&Object::String("fedex".into()))
    );
    assert_eq!(tasks[1].reference_task_name, "ship_fedex");
}

#[test]
fn switch_unmatched_case_without_default_fails() {
    init_logger();

    let workflow = workflow_from_json(
        r#"
    {
        "name": "switch_wf",
        "tasks": [
            {
                "name": "switch_by_service",
                "taskReferenceName": "switch_by_service",
                "type": "SWITCH",
                "evaluatorType": "value-param",
                "expression": "switchCaseValue",
                "inputParameters": { "switchCaseValue": "dhl" },
                "decisionCases": {
                    "fedex": [
                        { "name": "ship_fedex", "taskReferenceName": "ship_fedex", "type": "SIMPLE" }
                    ]
                }
            }
        ]
    }"#,
    );
    let id_generator = SeqIdGenerator::new();

    let result = TaskMapperRegistry::get_tasks_to_be_scheduled(
        &workflow,
        &workflow.workflow_definition.tasks[0],
        0,
        &InlineStr::new(),
        &id_generator,
    );
    assert_eq!(
        result.expect_err("mapping should fail").code(),
        ErrorCode::TERMINATE_WORKFLOW_CODE
    );
}

#[test]
fn sub_workflow_unit_references_nested_workflow() {
    init_logger();

    let workflow = workflow_from_json(
        r#"
    {
        "name": "parent_wf",
        "tasks": [
            {
                "name": "start_child",
                "taskReferenceName": "start_child",
                "type": "SUB_WORKFLOW",
                "inputParameters": { "seed": "s1" },
                "subWorkflowParam": { "name": "child_wf", "version": 2 }
            }
        ]
    }"#,
    );
    let id_generator = SeqIdGenerator::new();

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
    assert_eq!(
        task.input_data.get("subWorkflowName"),
        Some(&Object::String("child_wf".into()))
    );
    assert_eq!(task.input_data.get("subWorkflowVersion"), Some(&Object::Int(2)));
    match task.input_data.get("workflowInput") {
        Some(Object::Map(input)) => {
            assert_eq!(input.get("seed"), Some(&Object::String("s1".into())))
        }
        other => panic!("workflowInput missing or not a map: {:?}", other),
    }
}

#[test]
fn event_unit_carries_sink() {
    init_logger();

    let workflow = workflow_from_json(
        r#"
    {
        "name": "event_wf",
        "tasks": [
            {
                "name": "notify",
                "taskReferenceName": "notify",
                "type": "EVENT",
                "sink": "sqs:queue_name"
            }
        ]
    }"#,
    );
    let id_generator = SeqIdGenerator::new();

    let tasks = TaskMapperRegistry::get_tasks_to_be_scheduled(
        &workflow,
        &workflow.workflow_definition.tasks[0],
        0,
        &InlineStr::new(),
        &id_generator,
    )
    .expect("mapping failed");

    assert_eq!(tasks.len(), 1);
    assert_eq!(
        tasks[0].input_data.get("sink"),
        Some(&Object::String("sqs:queue_name".into()))
    );
    assert!(tasks[0].isolation_group_id.is_empty());
}

#[test]
fn retry_derives_traceable_identifier() {
    init_logger();

    let workflow = workflow_from_json(
        r#"
    {
        "name": "retry_wf",
        "tasks": [
            {
                "name": "flaky_unregistered",
                "taskReferenceName": "flaky",
                "type": "SIMPLE"
            }
        ]
    }"#,
    );
    let id_generator = SeqIdGenerator::new();

    let first = TaskMapperRegistry::get_tasks_to_be_scheduled(
        &workflow,
        &workflow.workflow_definition.tasks[0],
        0,
        &InlineStr::new(),
        &id_generator,
    )
    .expect("mapping failed");
    let original_id = first[0].task_id.clone();

    let retried = TaskMapperRegistry::get_tasks_to_be_scheduled(
        &workflow,
        &workflow.workflow_definition.tasks[0],
        1,
        &original_id,
        &id_generator,
    )
    .expect("mapping failed");
    assert_ne!(retried[0].task_id, original_id);
    assert!(retried[0].task_id.starts_with(original_id.as_str()));
    assert_eq!(retried[0].retried_task_id, original_id);

    // reproducible: re-expanding the same retry yields the same identifier
    let retried_again = TaskMapperRegistry::get_tasks_to_be_scheduled(
        &workflow,
        &workflow.workflow_definition.tasks[0],
        1,
        &original_id,
        &id_generator,
    )
    .expect("mapping failed");
    assert_eq!(retried_again[0].task_id, retried[0].task_id);
}

#[test]
fn task_id_binding_resolves_to_assigned_identifier() {
    init_logger();

    let workflow = workflow_from_json(
        r#"
    {
        "name": "binding_wf",
        "tasks": [
            {
                "name": "echo_unregistered",
                "taskReferenceName": "echo",
                "type": "SIMPLE",
                "inputParameters": { "self": "${WF_TASK_ID}" }
            }
        ]
    }"#,
    );
    let id_generator = SeqIdGenerator::new();

    let first = TaskMapperRegistry::get_tasks_to_be_scheduled(
        &workflow,
        &workflow.workflow_definition.tasks[0],
        0,
        &InlineStr::new(),
        &id_generator,
    )
    .expect("mapping failed");
    assert_eq!(
        first[0].input_data.get("self"),
        Some(&Object::String(first[0].task_id.clone()))
    );

    // the retry unit keeps the derived descendant id and its input bindings
    // must see that id, not a freshly minted one
    let original_id = first[0].task_id.clone();
    let retried = TaskMapperRegistry::get_tasks_to_be_scheduled(
        &workflow,
        &workflow.workflow_definition.tasks[0],
        1,
        &original_id,
        &id_generator,
    )
    .expect("mapping failed");
    assert_ne!(retried[0].task_id, original_id);
    assert_eq!(
        retried[0].input_data.get("self"),
        Some(&Object::String(retried[0].task_id.clone()))
    );
}

#[test]
fn unknown_task_type_is_rejected() {
    init_logger();

    let workflow = workflow_from_json(
        r#"
    {
        "name": "bogus_wf",
        "tasks": [
            {
                "name": "bogus",
                "taskReferenceName": "bogus",
                "type": "NOT_A_TASK_TYPE"
            }
        ]
    }"#,
    );
    let id_generator = SeqIdGenerator::new();

    let result = TaskMapperRegistry::get_tasks_to_be_scheduled(
        &workflow,
        &workflow.workflow_definition.tasks[0],
        0,
        &InlineStr::new(),
        &id_generator,
    );
    let err = result.expect_err("mapping should fail");
    assert_eq!(err.code(), 1005);
    assert!(err.message().contains("NOT_A_TASK_TYPE"));
}

#[test]
fn structurally_identical_contexts_map_identically() {
    init_logger();

    let workflow = workflow_from_json(
        r#"
    {
        "name": "det_wf",
        "tasks": [
            {
                "name": "det_task_unregistered",
                "taskReferenceName": "det",
                "type": "SIMPLE",
                "inputParameters": { "a": 1, "b": "two" }
            }
        ]
    }"#,
    );
    let id_generator = SeqIdGenerator::new();

    let first = TaskMapperRegistry::get_tasks_to_be_scheduled(
        &workflow,
        &workflow.workflow_definition.tasks[0],
        0,
        &InlineStr::new(),
        &id_generator,
    )
    .expect("mapping failed");
    let second = TaskMapperRegistry::get_tasks_to_be_scheduled(
        &workflow,
        &workflow.workflow_definition.tasks[0],
        0,
        &InlineStr::new(),
        &id_generator,
    )
    .expect("mapping failed");

    assert_eq!(first.len(), second.len());
    for (a, b) in first.iter().zip(second.iter()) {
        assert_ne!(a.task_id, b.task_id);
        assert_eq!(a.task_type, b.task_type);
        assert_eq!(a.reference_task_name, b.reference_task_name);
        assert_eq!(a.status, b.status);
        assert_eq!(a.input_data, b.input_data);
        assert_eq!(a.isolation_group_id, b.isolation_group_id);
        assert_eq!(a.execution_name_space, b.execution_name_space);
    }
}
