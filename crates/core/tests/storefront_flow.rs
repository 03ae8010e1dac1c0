//! End-to-end shopping flow over the pure stores.

use rust_decimal::dec;
use savego::{
    cart::{Cart, NewCartItem},
    filter::{ProductQuery, SortKey},
    products::{Category, Product},
    session::{Role, Session, User},
};
use testresult::TestResult;

fn catalog() -> Vec<Product> {
    vec![
        Product {
            id: 1,
            name: "Apple".to_string(),
            description: None,
            price: dec!(2),
            stock_quantity: 5,
            image_url: None,
            is_active: true,
            category: Some(Category {
                id: 1,
                name: "Fruit".to_string(),
                description: None,
            }),
        },
        Product {
            id: 2,
            name: "Banana".to_string(),
            description: None,
            price: dec!(1),
            stock_quantity: 40,
            image_url: None,
            is_active: true,
            category: Some(Category {
                id: 1,
                name: "Fruit".to_string(),
                description: None,
            }),
        },
    ]
}

fn snapshot(product: &Product) -> NewCartItem {
    NewCartItem {
        id: product.id,
        name: product.name.clone(),
        price: product.price,
        image_url: product.image_url.clone(),
        stock_quantity: product.stock_quantity,
    }
}

#[test]
fn browse_filter_and_shop() -> TestResult {
    let catalog = catalog();

    // Shopper searches for apples, cheapest first.
    let query = ProductQuery {
        search: "app".to_string(),
        category: None,
        sort: SortKey::PriceAsc,
    };
    let displayed = query.apply(&catalog);

    assert_eq!(displayed.len(), 1);
    let apple = displayed.first().ok_or("empty display list")?;
    assert_eq!(apple.name, "Apple");

    // Add 3, then try to add 4 more against a stock ceiling of 5.
    let mut cart = Cart::new();
    cart.add_item(snapshot(apple), 3);
    cart.add_item(snapshot(apple), 4);

    assert_eq!(cart.get(1).map(|item| item.quantity), Some(5));
    assert_eq!(cart.total(), dec!(10));
    assert!(cart.is_open());

    // Driving the quantity to zero clamps to one; removal empties.
    cart.update_quantity(1, 0);
    assert_eq!(cart.get(1).map(|item| item.quantity), Some(1));

    cart.remove_item(1);
    assert!(cart.is_empty());
    assert_eq!(cart.total(), dec!(0));

    Ok(())
}

#[test]
fn session_gates_protected_views() {
    let mut session = Session::new();

    assert!(session.bearer_token().is_none());

    session.login(
        User {
            id: 3,
            email: "pat@example.com".to_string(),
            username: "pat".to_string(),
            first_name: None,
            last_name: None,
            role: Role::Customer,
        },
        "tok-3".to_string(),
    );

    assert!(session.is_authenticated());
    assert_eq!(session.bearer_token(), Some("tok-3"));

    session.logout();

    assert!(!session.is_authenticated());
    assert!(session.bearer_token().is_none());
}
