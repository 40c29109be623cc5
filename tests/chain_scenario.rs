use std::sync::Arc;

use chunk_chain::{Chain, ChainConfig, Chunk, Miner};
use sha2::{Digest, Sha256};

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn first_solution(parent_pow: u64, prefix: &str) -> u64 {
    (0..)
        .find(|n: &u64| hex::encode(Sha256::digest(format!("{parent_pow}{n}"))).starts_with(prefix))
        .expect("solution")
}

#[test]
fn genesis_and_child_then_tamper() {
    init_logger();

    let mut genesis = Chunk::genesis(1, "a");
    let nonce = genesis.mine();
    assert_eq!(nonce, first_solution(0, "0"));
    genesis.generate_hash(true).expect("hash");
    assert!(genesis.is_valid());
    let genesis = Arc::new(genesis);

    let mut child = Chunk::child(&genesis, 1, "b");
    let child_nonce = child.mine();
    assert_eq!(child_nonce, first_solution(nonce, "0"));
    child.generate_hash(true).expect("hash");
    assert!(child.is_valid());

    child.data = "c".into();
    assert!(!child.is_valid());
}

#[test]
fn chain_from_config_stays_valid() {
    init_logger();

    let config = ChainConfig::from_lookup(|key| match key {
        "CHAIN_DIFFICULTY" => Some("1".into()),
        _ => None,
    });
    let mut chain = Chain::new(&config).expect("chain");
    chain.mine_chunk("first").expect("mine");
    chain.mine_chunk("second").expect("mine");

    assert_eq!(chain.len(), 3);
    assert!(chain.is_valid_chain());
    assert!(chain.tip().is_valid_lineage());

    let json = chain.tip().to_json().expect("json");
    let record: serde_json::Value = serde_json::from_str(&json).expect("parse");
    assert_eq!(record["parent_hash"], hex::encode(&chain.get(1).expect("chunk").hash));
    assert_eq!(record["data"], "second");
}
