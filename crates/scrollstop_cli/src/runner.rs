//! Plays a scenario against an edge watcher

use std::cell::RefCell;
use std::rc::Rc;

use indexmap::IndexMap;
use scrollstop::prelude::*;
use tracing::{debug, info};

use crate::scenario::{Scenario, Step};

/// Outcome of a scenario run
#[derive(Debug, Default)]
pub struct RunReport {
    /// `"<id> did reach <edge>"` / `"<id> did leave <edge>"` lines, in firing order
    pub transitions: Vec<String>,
    /// Classes on every element after the last step, in declaration order
    pub final_classes: Vec<(String, Vec<String>)>,
}

/// Run every step of `scenario`
///
/// `debug` turns on the watcher's own transition logging on top of the scenario config.
pub fn run(scenario: &Scenario, debug: bool) -> RunReport {
    let mut config = scenario.watcher.clone();
    config.debug |= debug;

    let elements: IndexMap<String, Rc<SimElement>> = scenario
        .elements
        .iter()
        .map(|spec| {
            let element = SimElement::new(
                (spec.visible[0], spec.visible[1]),
                (spec.content[0], spec.content[1]),
            )
            .with_scrollbar_width(spec.scrollbar_width)
            .with_offset(spec.offset[0], spec.offset[1]);
            (spec.id.clone(), Rc::new(element))
        })
        .collect();

    let dispatcher = Rc::new(ResizeDispatcher::new());
    let watcher = EdgeWatcher::new(config);
    let transitions = Rc::new(RefCell::new(Vec::new()));

    {
        let reached = transitions.clone();
        let left = transitions.clone();
        watcher
            .bind_resize(&dispatcher)
            .on_reach(move |_, id, edge| {
                info!("{id} did reach {edge}");
                reached.borrow_mut().push(format!("{id} did reach {edge}"));
            })
            .on_leave(move |_, id, edge| {
                info!("{id} did leave {edge}");
                left.borrow_mut().push(format!("{id} did leave {edge}"));
            });
    }

    for (index, step) in scenario.steps.iter().enumerate() {
        debug!(step = index + 1, ?step, "running step");
        // Targets were checked when the scenario was loaded.
        let target = step.target().and_then(|id| elements.get(id));

        match (step, target) {
            (Step::Watch { id }, Some(element)) => {
                watcher.watch(element, id);
            }
            (Step::Unwatch { id: Some(id) }, _) => {
                watcher.unwatch(id);
            }
            (Step::Unwatch { id: None }, _) => {
                watcher.unwatch_all();
            }
            (Step::Scroll { x, y, .. }, Some(element)) => {
                let (cur_x, cur_y) = element.scroll_offset();
                element.scroll_to(x.unwrap_or(cur_x), y.unwrap_or(cur_y));
            }
            (Step::ScrollBy { dx, dy, .. }, Some(element)) => {
                element.scroll_by(*dx, *dy);
            }
            (Step::Resize { width, height, .. }, Some(element)) => {
                element.set_visible_size(*width, *height);
                dispatcher.dispatch();
            }
            (Step::Content { width, height, .. }, Some(element)) => {
                element.set_content_size(*width, *height);
            }
            (Step::Refresh { id: Some(id), silent }, _) => {
                if *silent {
                    watcher.refresh_silent(id);
                } else {
                    watcher.refresh(id);
                }
            }
            (Step::Refresh { id: None, .. }, _) => {
                watcher.refresh_all();
            }
            (step, None) => {
                debug!(?step, "skipping step without a known element");
            }
        }
    }

    let final_classes = elements
        .iter()
        .map(|(id, element)| (id.clone(), element.classes()))
        .collect();

    let transitions = transitions.take();

    RunReport {
        transitions,
        final_classes,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DEMO: &str = include_str!("../scenarios/three_scrollers.toml");

    #[test]
    fn test_reach_and_leave_scenario() {
        let scenario = Scenario::from_toml_str(
            r#"
            [watcher]
            silent_initial_refresh = false

            [[element]]
            id = "list"
            visible = [200.0, 200.0]
            content = [200.0, 500.0]

            [[step]]
            action = "watch"
            id = "list"

            [[step]]
            action = "scroll"
            id = "list"
            y = 300.0
            "#,
        )
        .unwrap();

        let report = run(&scenario, false);
        assert_eq!(
            report.transitions,
            vec![
                "list did reach top",
                "list did leave top",
                "list did reach bottom"
            ]
        );
        assert_eq!(
            report.final_classes,
            vec![("list".to_string(), vec!["scroll-bottom".to_string()])]
        );
    }

    #[test]
    fn test_resize_step_refreshes() {
        let scenario = Scenario::from_toml_str(
            r#"
            [[element]]
            id = "list"
            visible = [200.0, 200.0]
            content = [200.0, 500.0]

            [[step]]
            action = "watch"
            id = "list"

            [[step]]
            action = "resize"
            id = "list"
            width = 200.0
            height = 600.0
            "#,
        )
        .unwrap();

        let report = run(&scenario, false);
        assert_eq!(report.transitions, vec!["list did leave top"]);
        assert!(report.final_classes[0].1.is_empty());
    }

    #[test]
    fn test_content_change_needs_refresh() {
        let scenario = Scenario::from_toml_str(
            r#"
            [[element]]
            id = "feed"
            visible = [300.0, 300.0]
            content = [300.0, 300.0]

            [[step]]
            action = "watch"
            id = "feed"

            [[step]]
            action = "content"
            id = "feed"
            width = 300.0
            height = 900.0

            [[step]]
            action = "refresh"
            id = "feed"
            "#,
        )
        .unwrap();

        let report = run(&scenario, false);
        assert_eq!(report.transitions, vec!["feed did reach top"]);
    }

    #[test]
    fn test_demo_scenario_runs() {
        let scenario = Scenario::from_toml_str(DEMO).unwrap();
        let report = run(&scenario, false);

        assert_eq!(report.final_classes.len(), 3);
        assert!(report
            .transitions
            .iter()
            .any(|t| t == "scroller-1 did reach bottom"));
        // scroller-2 was unwatched, so its markers are gone
        assert!(report.final_classes[1].1.is_empty());
    }
}
