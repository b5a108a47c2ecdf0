use std::error::Error;

use uibuild::pipeline::{Goal, Plan, StepId};

type TestResult = Result<(), Box<dyn Error>>;

const COPY_PHASE: [StepId; 3] = [StepId::Assets, StepId::Scripts, StepId::Compose];

#[test]
fn build_plan_joins_copy_phase_before_styles_and_bundle() -> TestResult {
    let plan = Plan::for_goal(Goal::Build);
    let graph = plan.graph();

    let mut roots = graph.roots();
    roots.sort();
    let mut expected = COPY_PHASE.to_vec();
    expected.sort();
    assert_eq!(roots, expected);

    for step in [StepId::Styles, StepId::Bundle] {
        let mut deps = graph.dependencies_of(step).to_vec();
        deps.sort();
        let mut expected = COPY_PHASE.to_vec();
        expected.sort();
        assert_eq!(deps, expected, "deps of {step}");
    }

    assert!(!graph.contains(StepId::Deploy));
    assert!(!graph.contains(StepId::Lint));

    Ok(())
}

#[test]
fn build_topo_order_puts_every_copy_step_before_styles_and_bundle() -> TestResult {
    let plan = Plan::for_goal(Goal::Build);
    let order = plan.graph().topo_order()?;

    let pos = |s: StepId| order.iter().position(|x| *x == s).unwrap();

    for copy in COPY_PHASE {
        assert!(pos(copy) < pos(StepId::Styles));
        assert!(pos(copy) < pos(StepId::Bundle));
    }

    Ok(())
}

#[test]
fn prod_plan_gates_every_copy_step_on_lint() -> TestResult {
    let plan = Plan::for_goal(Goal::Prod);
    let graph = plan.graph();

    assert_eq!(graph.roots(), vec![StepId::Lint]);
    for copy in COPY_PHASE {
        assert_eq!(graph.dependencies_of(copy), &[StepId::Lint]);
    }
    assert!(!graph.contains(StepId::Deploy));

    Ok(())
}

#[test]
fn dev_plan_puts_deploy_behind_styles_and_bundle() -> TestResult {
    for goal in [Goal::Dev, Goal::Watch] {
        let plan = Plan::for_goal(goal);
        let graph = plan.graph();

        let mut deps = graph.dependencies_of(StepId::Deploy).to_vec();
        deps.sort();
        let mut expected = vec![StepId::Styles, StepId::Bundle];
        expected.sort();
        assert_eq!(deps, expected, "deploy deps for goal {goal}");
        assert!(!graph.contains(StepId::Lint));
    }

    Ok(())
}

#[test]
fn single_step_goals_have_single_step_plans() -> TestResult {
    let eslint = Plan::for_goal(Goal::Eslint);
    assert_eq!(eslint.graph().steps().collect::<Vec<_>>(), vec![StepId::Lint]);

    let deploy = Plan::for_goal(Goal::Deploy);
    assert_eq!(
        deploy.graph().steps().collect::<Vec<_>>(),
        vec![StepId::Deploy]
    );

    Ok(())
}

#[test]
fn every_goal_plan_is_acyclic() -> TestResult {
    for goal in Goal::ALL {
        Plan::for_goal(goal).graph().check_acyclic()?;
    }
    Ok(())
}
