use planner::output::{format_human, HumanOutput};

#[test]
fn format_human_includes_sections() {
    let mut human = HumanOutput::new("Task added");
    human.push_summary("ID", "1");
    human.push_detail("09:00 Standup");
    human.push_warning("No tasks for 2024-01-02");
    human.push_next_step("planner list --today");

    let rendered = format_human(&human);
    assert!(rendered.contains("Task added"));
    assert!(rendered.contains("Summary:"));
    assert!(rendered.contains("- ID: 1"));
    assert!(rendered.contains("Details:"));
    assert!(rendered.contains("- 09:00 Standup"));
    assert!(rendered.contains("Warnings:"));
    assert!(rendered.contains("- No tasks for 2024-01-02"));
    assert!(rendered.contains("Next steps:"));
    assert!(rendered.contains("- planner list --today"));
}

#[test]
fn format_human_omits_empty_sections() {
    let human = HumanOutput::new("Tasks");
    let rendered = format_human(&human);
    assert_eq!(rendered, "Tasks");
}
