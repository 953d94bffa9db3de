use drip::{derive_account, DripConfig, Faucet, FaucetReply, FaucetSettings, HttpFaucet};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("🔗 Testing Faucet Connection...\n");

    // Reads DRIP_CONFIG / ETHEREUM_* like the main binary
    let config = DripConfig::load(None)?;
    config.validate()?;

    let settings = FaucetSettings::from_config(&config);
    println!("   📡 Faucet: {}", settings.url);
    println!("   🪙 Token: {}", settings.token);
    println!("   ⏱️  Timeout: {:?}", settings.timeout);

    let account = derive_account(&config.ethereum.mnemonic, config.ethereum.start_number)?;
    println!("   📍 Address: {} ({})", account.address, account.path());

    let faucet = HttpFaucet::new(settings)?;

    println!("\n🧪 Single funding request");
    match faucet.request_funds(&account.address) {
        Ok(FaucetReply::Funded) => println!("   ✅ Faucet accepted the request"),
        Ok(FaucetReply::Busy) => println!("   ⏳ Faucet is busy, try again in a few seconds"),
        Ok(FaucetReply::Rejected { status, reason }) => {
            println!("   ❌ Faucet refused (HTTP {}): {}", status, reason)
        }
        Err(e) => println!("   ❌ Connection error: {}", e),
    }

    println!("\n🎯 Connection Test Complete!");
    Ok(())
}
