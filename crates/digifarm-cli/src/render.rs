//! Terminal rendering of snapshots and catalog entries.

use colored::Colorize;
use digifarm_core::auth::SessionSnapshot;
use digifarm_core::detection::{DetectionSnapshot, DetectionState};
use digifarm_core::disease::{DiseaseRecord, Severity};
use digifarm_core::marketplace::{Product, ProductDetail, QuantitySelector};

pub fn session(snapshot: &SessionSnapshot) {
    match snapshot.role {
        Some(role) => println!(
            "{} {}",
            snapshot.username.bright_green().bold(),
            format!("({})", role).bright_black()
        ),
        None => println!("{}", "Not signed in".bright_black()),
    }
}

pub fn detection(snapshot: &DetectionSnapshot) {
    let state = snapshot.state.to_string();
    let state = match snapshot.state {
        DetectionState::Idle => state.bright_black(),
        DetectionState::Staged => state.cyan(),
        DetectionState::Analyzing => state.yellow(),
        DetectionState::Resolved => state.green(),
        DetectionState::Errored => state.red(),
    };
    println!("Detection: {}", state);
    if let (Some(name), Some(url)) = (&snapshot.file_name, &snapshot.preview_url) {
        println!("  Image:   {}", name);
        println!("  Preview: {}", url.bright_black());
    }
    if let Some(message) = &snapshot.error_message {
        println!("{}", message.red());
    }
    if let Some(record) = &snapshot.result {
        disease(record);
    }
}

pub fn disease(record: &DiseaseRecord) {
    let severity = match record.severity {
        Severity::Low => record.severity.to_string().green(),
        Severity::Medium => record.severity.to_string().yellow(),
        Severity::High => record.severity.to_string().red(),
    };
    println!();
    println!(
        "{} {} severity: {}",
        record.name.bright_magenta().bold(),
        format!("[{}]", record.crop).bright_black(),
        severity
    );
    println!("{}", record.description);

    println!("{}", "Symptoms".bold());
    for symptom in &record.symptoms {
        println!("  - {}", symptom);
    }
    println!("{}", "Solutions".bold());
    for (i, solution) in record.solutions.iter().enumerate() {
        println!("  {}. {}", i + 1, solution);
    }
    println!("{}", "Nearby medical shops".bold());
    for shop in &record.medical_shops {
        println!("  {} ({}) {}", shop.name.cyan(), shop.location, shop.phone.bright_black());
        println!("    stocks: {}", shop.available_products.join(", "));
    }
}

pub fn products(products: &[&Product]) {
    if products.is_empty() {
        println!("{}", "No products match your search.".bright_black());
        return;
    }
    for product in products {
        println!(
            "{:>3}  {}  {}  {}",
            product.id.to_string().bright_black(),
            product.name.bold(),
            format!("₹{}/{}", product.price, product.unit).green(),
            format!("★{:.1} {} ({})", product.rating, product.seller.name, product.seller.location)
                .bright_black()
        );
    }
}

pub fn product_detail(detail: &ProductDetail, quantity: &QuantitySelector) {
    let product = &detail.product;
    println!(
        "{}  {}",
        product.name.bright_magenta().bold(),
        format!("₹{}/{}", product.price, product.unit).green()
    );
    println!(
        "{}",
        format!(
            "★{:.1} ({} reviews) · {} · harvested {}",
            product.rating, detail.reviews, detail.farming_method, detail.harvest_date
        )
        .bright_black()
    );
    println!("{}", product.description);
    println!("{}", detail.long_description);
    println!();
    let seller = &detail.seller;
    println!("{} {}", "Seller:".bold(), seller.name);
    println!("  {} · {}", seller.location, seller.joined_date);
    println!("  {} · {}", seller.phone, seller.email);
    println!(
        "  responds to {} of messages · {} other products",
        seller.response_rate, seller.other_products
    );
    println!();
    order(product.price, &product.unit, quantity);
}

pub fn order(unit_price: u32, unit: &str, quantity: &QuantitySelector) {
    println!(
        "Quantity: {} {} (max {})  Total: {}",
        quantity.quantity().to_string().bold(),
        unit,
        quantity.max(),
        format!("₹{}", quantity.total_price(unit_price)).green().bold()
    );
}
