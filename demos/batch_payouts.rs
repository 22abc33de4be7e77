//! Batch payouts example: estimate, then pay a token and ETH batch
use alloy_primitives::address;
use multisend_sdk::amounts::aggregate;
use multisend_sdk::transaction::MultiSend;
use multisend_sdk::{MixedRecipient, Recipient, Result, SdkConfig, TxOptions};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let config = SdkConfig::new(
        "http://localhost:8545",
        address!("5FbDB2315678afecb367f032d93F642f64180aa3"),
    )
    .with_default_gas_limit(500_000);
    let multisend = MultiSend::from_config(config)?;

    let token = address!("e7f1725E7734CE288F8367e1Bb143E90bb3F0512");
    let alice = address!("70997970C51812dc3A010C7d01b50e0d17dc79C8");
    let bob = address!("3C44CdDdB6a900fa2b585dd299e03d12FA4293BC");

    let payroll = vec![
        Recipient::new(alice, "1500000000000000000"),
        Recipient::new(bob, "250000000000000000"),
    ];

    let tiers = multisend.gas_price_tiers().await?;
    println!(
        "Gas prices (wei): slow {} / average {} / fast {}",
        tiers.slow, tiers.average, tiers.fast
    );

    let estimate = multisend
        .estimate_eth_variable(payroll.clone(), TxOptions::default())
        .await?;
    println!(
        "Payroll: {} gas at {} wei = {} wei",
        estimate.gas_limit, estimate.gas_price, estimate.total_cost
    );

    let connected = multisend.connect_default().await?;
    let tx = connected
        .send_eth_variable(payroll, TxOptions::default().gas_price(tiers.fast))
        .await?;
    println!("Payroll submitted: {tx}");

    // Token bonus plus a little ETH for gas on the recipient side
    let bonus = vec![
        MixedRecipient::new(alice, 100u64, "10000000000000000"),
        MixedRecipient::new(bob, 40u64, "10000000000000000"),
    ];
    let required = aggregate(bonus.iter().map(|r| &r.token_amount))?;
    let status = connected.check_allowance(token, required).await?;
    if !status.sufficient {
        let approval = connected
            .approve_spending(token, status.required, TxOptions::default())
            .await?;
        println!("Approval submitted: {approval}");
    }

    let tx = connected
        .send_mixed_variable(token, bonus, TxOptions::default())
        .await?;
    println!("Bonus submitted: {tx}");

    Ok(())
}

