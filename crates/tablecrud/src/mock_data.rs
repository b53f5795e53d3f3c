use tablecrud_core::customer::CustomerRecord;

/// Generates demo customers for the in-memory store.
pub fn demo_customers() -> Vec<CustomerRecord> {
    [
        ("customer-001", "ada@example.com", "Ada", "ada@example.com"),
        ("customer-002", "grace@example.com", "Grace", "grace@example.com"),
        ("customer-003", "linus@example.com", "Linus", "linus@example.com"),
        ("lead-001", "barbara@example.com", "Barbara", "barbara@example.com"),
        ("lead-002", "ken@example.com", "Ken", "ken@example.com"),
        ("former-customer-001", "alan@example.com", "Alan", "alan@example.com"),
    ]
    .into_iter()
    .map(|(partition_key, row_key, first_name, email)| {
        CustomerRecord::new(partition_key, row_key, first_name, email)
    })
    .collect()
}
