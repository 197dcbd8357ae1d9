//! Browse example - pages through a simulated query with a lazy model
//!
//! Walks the first rows of a sorted "orders" query, changes the sort, then
//! persists the paging state and rebuilds the model from it, printing how
//! many times the source was queried along the way.
//!
//! Loader activity is logged to `browse.log`.

use std::cell::Cell;
use std::error::Error;
use std::fs::File;

use lazy_paging::adapter::{LazyListLoader, LazyListSource, SortOrder};
use lazy_paging::{BoxError, Filters, PagedModel, PagingConfig, PagingState};
use simplelog::{Config, LevelFilter, WriteLogger};

// =============================================================================
// Simulated query
// =============================================================================

const TOTAL_ORDERS: i32 = 137;

#[derive(Debug, Clone)]
struct Order {
    id: i32,
    amount: i32,
}

/// Pretends to run a paged SQL query, counting round trips.
struct OrderQuery {
    queries: Cell<usize>,
}

impl LazyListSource<Order> for OrderQuery {
    fn load(
        &self,
        first: i32,
        page_size: i32,
        sort_field: Option<&str>,
        sort_order: SortOrder,
        _filters: &Filters,
    ) -> Result<Vec<Order>, BoxError> {
        self.queries.set(self.queries.get() + 1);

        let mut orders: Vec<Order> = (0..TOTAL_ORDERS)
            .map(|id| Order {
                id,
                amount: (id * 37) % 500,
            })
            .collect();
        if sort_field == Some("amount") {
            orders.sort_by_key(|order| order.amount);
            if sort_order == SortOrder::Descending {
                orders.reverse();
            }
        }

        Ok(orders
            .into_iter()
            .skip(first as usize)
            .take(page_size as usize)
            .collect())
    }

    fn row_count(&self) -> Option<u64> {
        Some(TOTAL_ORDERS as u64)
    }
}

type OrderModel = PagedModel<Order, LazyListLoader<OrderQuery>>;

fn print_rows(model: &mut OrderModel, rows: std::ops::Range<i32>) -> Result<(), Box<dyn Error>> {
    for index in rows {
        model.set_row_index(index)?;
        if !model.is_row_available()? {
            break;
        }
        let order = model.row_data()?;
        println!("  #{:<4} order {:>3}  amount {:>4}", index, order.id, order.amount);
    }
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    let log_file = File::create("browse.log")?;
    WriteLogger::init(LevelFilter::Debug, Config::default(), log_file)?;

    let config = PagingConfig::default().with_page_size(8);
    let loader = LazyListLoader::new(OrderQuery {
        queries: Cell::new(0),
    });
    let mut model = PagedModel::with_config(loader, config)?;
    model.add_row_listener(|index, order: Option<&Order>| {
        if let Some(order) = order {
            log::info!("Selected row {} (order {})", index, order.id);
        }
    });

    println!("{:?} orders", model.row_count()?);
    println!("First rows, unsorted:");
    print_rows(&mut model, 0..12)?;

    model.toggle_sort("amount");
    model.toggle_sort("amount");
    println!("Largest amounts:");
    print_rows(&mut model, 0..5)?;

    println!("Tail of the result:");
    print_rows(&mut model, 134..140)?;

    let bytes = model.state().to_bytes()?;
    let queries = model.loader().source().queries.get();
    println!("{} queries so far, state is {} bytes", queries, bytes.len());

    let state = PagingState::from_bytes(&bytes)?;
    let loader = LazyListLoader::new(OrderQuery {
        queries: Cell::new(0),
    });
    let mut restored = PagedModel::from_state(loader, state)?;
    let row_index = restored.row_index();
    let order_id = restored.row_data_at(135)?.id;
    println!("Restored at row {}, row 135 is order {}", row_index, order_id);
    Ok(())
}
