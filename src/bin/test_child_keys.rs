use drip::{derivation_path, KeyDeriver};

const TEST_MNEMONIC: &str = "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";

fn main() {
    println!("🔑 Testing Account Derivation...\n");

    let deriver = KeyDeriver::new(TEST_MNEMONIC).unwrap();
    println!("✅ Key deriver created for the test mnemonic");
    println!();

    for index in 0..4 {
        println!("🔐 Deriving account at path: {}", derivation_path(index));

        match deriver.derive(index) {
            Ok(account) => {
                println!("   ✅ Address: {}", account.address);
                println!("   🔏 Public key: 0x{}", account.public_key_hex());
            }
            Err(e) => {
                println!("   ❌ Failed: {}", e);
            }
        }
        println!();
    }

    // Same index from a fresh deriver should give the same account
    println!("🔄 Testing Deterministic Behavior...");
    let first = deriver.derive(0).unwrap();
    let second = KeyDeriver::new(TEST_MNEMONIC).unwrap().derive(0).unwrap();

    if first.address == second.address && first.private_key_hex() == second.private_key_hex() {
        println!("   ✅ Deterministic! Same index = same account");
        println!("   📍 Address: {}", first.address);
    } else {
        println!("   ❌ Non-deterministic! This is a problem!");
    }

    println!("\n🎉 Account Derivation Test Complete!");
}
