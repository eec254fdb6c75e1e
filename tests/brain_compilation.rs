use gridgp::{
    CgpConfig, CgpContext, FunctionGene, FunctionId, Genotype, NodeOp, OutputGene,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;

fn context(rows: usize, columns: usize, inputs: usize, outputs: usize) -> Arc<CgpContext> {
    let config = CgpConfig {
        rows,
        columns,
        levels_back: columns.max(1),
        evolvable_constants_count: 0,
        ..CgpConfig::default()
    };
    Arc::new(CgpContext::new(config, inputs, outputs).unwrap())
}

fn function_gene(id: FunctionId, connections: [u16; 2]) -> FunctionGene {
    FunctionGene {
        op: NodeOp::Function(id),
        connections,
    }
}

#[test]
fn test_dead_code_is_not_compiled() {
    // 2 inputs (addresses 0-1), grid 2x2 (addresses 2-5);
    // only Add (addr 2) and Subtract (addr 4) are reachable
    let ctx = context(2, 2, 2, 1);
    let genotype = Genotype::from_genes(
        ctx,
        vec![
            function_gene(FunctionId::Add, [0, 1]),
            function_gene(FunctionId::Multiply, [0, 0]),
            function_gene(FunctionId::Subtract, [2, 1]),
            function_gene(FunctionId::Negate, [3, 0]),
        ],
        vec![OutputGene { connection: 4 }],
        Vec::new(),
    )
    .unwrap();

    let mut brain = genotype.grow();
    assert_eq!(brain.instructions().len(), 2);
    assert_eq!(brain.register_count(), 2 + 2);

    brain.set_input(0, 3.0);
    brain.set_input(1, 5.0);
    brain.think();
    // (3 + 5) - 5
    assert_eq!(brain.output(0), 3.0);
}

#[test]
fn test_tape_is_topologically_ordered() {
    let ctx = context(3, 4, 4, 2);
    let mut rng = StdRng::seed_from_u64(0x7A9E);

    for _ in 0..200 {
        let mut genotype = Genotype::new(Arc::clone(&ctx));
        genotype.create_primordial_seed(&mut rng);
        let brain = genotype.grow();

        assert!(brain.instructions().len() <= 3 * 4);
        assert_eq!(
            brain.register_count(),
            4 + brain.instructions().len(),
            "one register per instruction"
        );
        for instruction in brain.instructions() {
            for &source in &instruction.sources {
                assert!(
                    source < instruction.dst,
                    "source {} does not precede destination {}",
                    source,
                    instruction.dst
                );
            }
        }
    }
}

#[test]
fn test_shared_subexpressions_compile_once() {
    // diamond: node 1 (addr 2) reads node 0 (addr 1) twice, node 2
    // (addr 3) reads both; naive recompilation would duplicate node 0
    let ctx = context(1, 3, 1, 2);
    let genotype = Genotype::from_genes(
        ctx,
        vec![
            function_gene(FunctionId::Add, [0, 0]),
            function_gene(FunctionId::Multiply, [1, 1]),
            function_gene(FunctionId::Add, [1, 2]),
        ],
        vec![OutputGene { connection: 3 }, OutputGene { connection: 2 }],
        Vec::new(),
    )
    .unwrap();

    let mut brain = genotype.grow();
    assert_eq!(brain.instructions().len(), 3);

    brain.set_input(0, 2.0);
    brain.think();
    // node0 = 4, node1 = 16, node2 = 20
    assert_eq!(brain.output(0), 20.0);
    assert_eq!(brain.output(1), 16.0);
}

#[test]
fn test_nan_output_is_sanitized_to_infinity() {
    // the only reachable instruction is Divide(0, 0)
    let ctx = context(1, 1, 1, 1);
    let genotype = Genotype::from_genes(
        ctx,
        vec![function_gene(FunctionId::Divide, [0, 0])],
        vec![OutputGene { connection: 1 }],
        Vec::new(),
    )
    .unwrap();

    let mut brain = genotype.grow();
    brain.set_input(0, 0.0);
    brain.think();
    let value = brain.output(0);
    assert!(!value.is_nan());
    assert_eq!(value, f32::INFINITY);

    // NaN is sanitized only at the boundary; a well-defined division
    // still comes through untouched
    brain.set_input(0, 3.0);
    brain.think();
    assert_eq!(brain.output(0), 1.0);
}

#[test]
fn test_output_wired_directly_to_an_input() {
    let ctx = context(1, 1, 2, 1);
    let genotype = Genotype::from_genes(
        ctx,
        vec![function_gene(FunctionId::Add, [0, 1])],
        vec![OutputGene { connection: 1 }],
        Vec::new(),
    )
    .unwrap();

    let mut brain = genotype.grow();
    assert!(brain.instructions().is_empty(), "no function node is reachable");
    assert_eq!(brain.outputs_map()[0], 1);
    brain.set_input(0, 7.0);
    brain.set_input(1, 41.5);
    brain.think();
    assert_eq!(brain.output(0), 41.5);
}

#[test]
fn test_stateful_functions_carry_state_across_steps() {
    let ctx = context(1, 1, 1, 1);
    let genotype = Genotype::from_genes(
        ctx,
        vec![function_gene(FunctionId::TimeDelay, [0, 0])],
        vec![OutputGene { connection: 1 }],
        Vec::new(),
    )
    .unwrap();

    let mut brain = genotype.grow();
    brain.set_input(0, 5.0);
    brain.think();
    assert_eq!(brain.output(0), 0.0);

    brain.set_input(0, 7.0);
    brain.think();
    assert_eq!(brain.output(0), 5.0);

    brain.reset_state();
    brain.set_input(0, 9.0);
    brain.think();
    assert_eq!(brain.output(0), 0.0);
}

#[test]
fn test_evolvable_constant_node() {
    let config = CgpConfig {
        rows: 1,
        columns: 2,
        levels_back: 2,
        evolvable_constants_count: 2,
        ..CgpConfig::default()
    };
    let ctx = Arc::new(CgpContext::new(config, 1, 1).unwrap());
    let genotype = Genotype::from_genes(
        ctx,
        vec![
            FunctionGene {
                op: NodeOp::Constant(1),
                connections: [0, 0],
            },
            function_gene(FunctionId::Multiply, [0, 1]),
        ],
        vec![OutputGene { connection: 2 }],
        vec![-0.5, 2.5],
    )
    .unwrap();

    let mut brain = genotype.grow();
    brain.set_input(0, 4.0);
    brain.think();
    assert_eq!(brain.output(0), 10.0);
}

#[test]
fn test_brain_is_rebuilt_fresh_each_episode() {
    let ctx = context(2, 3, 2, 1);
    let mut rng = StdRng::seed_from_u64(0xEE);
    let mut genotype = Genotype::new(ctx);
    genotype.create_primordial_seed(&mut rng);

    let first: Vec<_> = {
        let brain = genotype.grow();
        brain.instructions().to_vec()
    };
    let second: Vec<_> = {
        let brain = genotype.grow();
        brain.instructions().to_vec()
    };
    assert_eq!(first.len(), second.len());
    for (a, b) in first.iter().zip(second.iter()) {
        assert_eq!(a.op, b.op);
        assert_eq!(a.sources, b.sources);
        assert_eq!(a.dst, b.dst);
    }
}
