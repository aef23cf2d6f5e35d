//! Shared test instances.
//!
//! `five_task_instance` is the calibration workflow used throughout the
//! fitness tests: three heterogeneous hosts and a five-task fork-join DAG
//! whose cost matrices and schedules are small enough to verify by hand.

use std::sync::Arc;

use crate::models::{
    FileDirection, FileList, Host, InstanceData, Plan, PlanPair, Task, TaskFile,
};

fn input(name: &str, size: u64) -> TaskFile {
    TaskFile::new(name, FileDirection::Input, size)
}

fn output(name: &str, size: u64) -> TaskFile {
    TaskFile::new(name, FileDirection::Output, size)
}

/// Three hosts at 1x / 2x / 2.5x the reference speed, equal disk and
/// network bandwidth, increasing energy rates.
fn calibration_hosts() -> Vec<Host> {
    vec![
        Host::new("HostA", 1_000_000_000, 80_000_000, 80_000_000, 0.9, 0.1),
        Host::new("HostB", 2_000_000_000, 80_000_000, 80_000_000, 1.8, 0.2),
        Host::new("HostC", 2_500_000_000, 80_000_000, 80_000_000, 2.0, 0.25),
    ]
}

/// Fork-join workflow: task01 fans out to task02/03/04, which join at
/// task05. task04 additionally stages in an external file, and task01
/// stages in its own input.
pub fn five_task_instance() -> InstanceData {
    let mut task01 = Task::new(
        "task01",
        10.0,
        FileList::new(vec![input("stage_in.dat", 80_000_000)]),
        FileList::new(vec![
            output("f12.dat", 144_000_000),
            output("f13.dat", 96_000_000),
            output("f14.dat", 64_000_000),
        ]),
    );
    let mut task02 = Task::new(
        "task02",
        15.0,
        FileList::new(vec![input("f12.dat", 144_000_000)]),
        FileList::new(vec![output("f25.dat", 160_000_000)]),
    );
    let mut task03 = Task::new(
        "task03",
        5.0,
        FileList::new(vec![input("f13.dat", 96_000_000)]),
        FileList::new(vec![output("f35.dat", 192_000_000)]),
    );
    let mut task04 = Task::new(
        "task04",
        20.0,
        FileList::new(vec![
            input("f14.dat", 64_000_000),
            input("ext04.dat", 128_000_000),
        ]),
        FileList::new(vec![output("f45.dat", 224_000_000)]),
    );
    let mut task05 = Task::new(
        "task05",
        8.0,
        FileList::new(vec![
            input("f25.dat", 160_000_000),
            input("f35.dat", 192_000_000),
            input("f45.dat", 224_000_000),
        ]),
        FileList::default(),
    );

    task01.children = vec![1, 2, 3];
    task02.parents = vec![0];
    task02.children = vec![4];
    task03.parents = vec![0];
    task03.children = vec![4];
    task04.parents = vec![0];
    task04.children = vec![4];
    task05.parents = vec![1, 2, 3];

    InstanceData::new(
        vec![task01, task02, task03, task04, task05],
        calibration_hosts(),
        1_000_000_000,
    )
}

/// `five_task_instance` behind an `Arc`, as calculators take it.
pub fn five_task_shared() -> Arc<InstanceData> {
    Arc::new(five_task_instance())
}

/// The baseline plan the calibration values are pinned on: tasks in
/// index order on hosts A, B, C, A, C.
pub fn five_task_baseline_plan() -> Plan {
    vec![
        PlanPair::new(0, 0),
        PlanPair::new(1, 1),
        PlanPair::new(2, 2),
        PlanPair::new(3, 0),
        PlanPair::new(4, 2),
    ]
}

/// Diamond DAG (t1 fans out to t2/t3, joining at t4) on two hosts, no
/// data files. Used for plan-generator and operator properties.
pub fn diamond_instance() -> InstanceData {
    let mut t1 = Task::new("t1", 4.0, FileList::default(), FileList::default());
    let mut t2 = Task::new("t2", 2.0, FileList::default(), FileList::default());
    let mut t3 = Task::new("t3", 3.0, FileList::default(), FileList::default());
    let mut t4 = Task::new("t4", 1.0, FileList::default(), FileList::default());
    t1.children = vec![1, 2];
    t2.parents = vec![0];
    t2.children = vec![3];
    t3.parents = vec![0];
    t3.children = vec![3];
    t4.parents = vec![1, 2];
    let hosts = vec![
        Host::new("h1", 1_000_000_000, 80_000_000, 80_000_000, 1.0, 0.1),
        Host::new("h2", 2_000_000_000, 80_000_000, 80_000_000, 2.0, 0.2),
    ];
    InstanceData::new(vec![t1, t2, t3, t4], hosts, 1_000_000_000)
}

/// One task, two hosts: the fast host halves the runtime but costs ten
/// times as much energy. Separates time-first from energy-first
/// strategies.
pub fn energy_tradeoff_instance() -> InstanceData {
    let t1 = Task::new("t1", 10.0, FileList::default(), FileList::default());
    let hosts = vec![
        Host::new("cheap", 1_000_000_000, 80_000_000, 80_000_000, 0.1, 0.0),
        Host::new("fast", 2_000_000_000, 80_000_000, 80_000_000, 1.0, 0.0),
    ];
    InstanceData::new(vec![t1], hosts, 1_000_000_000)
}
