// src/main.rs

use axum::{
    Router,
    middleware as axum_middleware,
    routing::{get, patch, post},
};
use tokio::net::TcpListener;

use varejo_backend::{config::AppState, handlers, middleware::auth::auth_guard};

#[tokio::main]
async fn main() {
    // Logger primeiro: as falhas de inicialização também devem aparecer.
    tracing_subscriber::fmt().with_target(false).compact().init();

    // .expect() é aceitável aqui: sem configuração, a aplicação não sobe.
    let app_state = AppState::new()
        .await
        .expect("Falha ao inicializar o estado da aplicação.");

    // Roda as migrações do SQLx na inicialização
    sqlx::migrate!()
        .run(&app_state.db_pool)
        .await
        .expect("Falha ao rodar as migrações do banco de dados.");

    tracing::info!("Migrações do banco de dados executadas com sucesso");

    // Rotas públicas de autenticação
    let auth_routes = Router::new().route("/login", post(handlers::auth::login));

    // Rotas de sessão (protegidas)
    let session_routes = Router::new()
        .route("/me", get(handlers::auth::get_me))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let product_routes = Router::new()
        .route(
            "/",
            get(handlers::products::list_products).post(handlers::products::create_product),
        )
        .route("/stats", get(handlers::products::product_stats))
        .route("/categories", get(handlers::products::list_categories))
        .route(
            "/{id}",
            get(handlers::products::get_product)
                .put(handlers::products::update_product)
                .delete(handlers::products::delete_product),
        )
        .route("/{id}/stock", patch(handlers::products::update_stock))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let supplier_routes = Router::new()
        .route(
            "/",
            get(handlers::partners::list_suppliers).post(handlers::partners::create_supplier),
        )
        .route("/{id}", get(handlers::partners::get_supplier))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let customer_routes = Router::new()
        .route(
            "/",
            get(handlers::partners::list_customers).post(handlers::partners::create_customer),
        )
        .route("/{id}", get(handlers::partners::get_customer))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let purchase_routes = Router::new()
        .route(
            "/",
            get(handlers::purchases::list_purchases).post(handlers::purchases::create_purchase),
        )
        .route("/stats", get(handlers::purchases::purchase_stats))
        .route("/search", get(handlers::purchases::search_purchases))
        .route(
            "/{id}",
            get(handlers::purchases::get_purchase)
                .put(handlers::purchases::update_purchase)
                .delete(handlers::purchases::delete_purchase),
        )
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    // PDV: vendas + consultas de apoio (produtos com estoque, clientes)
    let pos_routes = Router::new()
        .route(
            "/sales",
            get(handlers::sales::list_sales).post(handlers::sales::create_sale),
        )
        .route("/sales/stats", get(handlers::sales::sales_stats))
        .route("/sales/search", get(handlers::sales::search_sales))
        .route(
            "/sales/{id}",
            get(handlers::sales::get_sale)
                .put(handlers::sales::update_sale)
                .delete(handlers::sales::delete_sale),
        )
        .route("/products", get(handlers::sales::available_products))
        .route("/customers", get(handlers::sales::available_customers))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let stock_opname_routes = Router::new()
        .route(
            "/",
            get(handlers::stock_opname::list_opname).post(handlers::stock_opname::create_opname),
        )
        .route("/stats", get(handlers::stock_opname::opname_stats))
        .route(
            "/{id}",
            get(handlers::stock_opname::get_opname)
                .put(handlers::stock_opname::update_opname)
                .delete(handlers::stock_opname::delete_opname),
        )
        .route(
            "/{id}/apply-adjustment",
            patch(handlers::stock_opname::apply_adjustment),
        )
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let stock_request_routes = Router::new()
        .route(
            "/",
            get(handlers::stock_requests::list_requests)
                .post(handlers::stock_requests::create_request),
        )
        .route("/stats", get(handlers::stock_requests::request_stats))
        .route(
            "/low-stock",
            get(handlers::stock_requests::low_stock_products),
        )
        .route(
            "/{id}",
            get(handlers::stock_requests::get_request)
                .put(handlers::stock_requests::update_request)
                .delete(handlers::stock_requests::delete_request),
        )
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let account_routes = Router::new()
        .route(
            "/",
            get(handlers::ledger::list_accounts).post(handlers::ledger::create_account),
        )
        .route("/kind/{kind}", get(handlers::ledger::list_accounts_by_kind))
        .route(
            "/{id}",
            get(handlers::ledger::get_account)
                .put(handlers::ledger::update_account)
                .delete(handlers::ledger::delete_account),
        )
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let journal_routes = Router::new()
        .route(
            "/",
            get(handlers::ledger::list_entries).post(handlers::ledger::create_entry),
        )
        .route("/stats", get(handlers::ledger::journal_stats))
        .route("/trial-balance", get(handlers::ledger::trial_balance))
        .route(
            "/general-ledger/{account_id}",
            get(handlers::ledger::general_ledger),
        )
        .route("/search", get(handlers::ledger::search_entries))
        .route(
            "/{id}",
            get(handlers::ledger::get_entry)
                .put(handlers::ledger::update_entry)
                .delete(handlers::ledger::delete_entry),
        )
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    // Combina tudo no router principal
    let app = Router::new()
        .route("/api/v1/health", get(|| async { "OK" }))
        .nest("/api/v1/auth", auth_routes.merge(session_routes))
        .nest("/api/v1/products", product_routes)
        .nest("/api/v1/suppliers", supplier_routes)
        .nest("/api/v1/customers", customer_routes)
        .nest("/api/v1/purchases", purchase_routes)
        .nest("/api/v1/pos", pos_routes)
        .nest("/api/v1/stock-opname", stock_opname_routes)
        .nest("/api/v1/stock-requests", stock_request_routes)
        .nest("/api/v1/accounts", account_routes)
        .nest("/api/v1/journal", journal_routes)
        .with_state(app_state);

    // Inicia o servidor
    let addr = "0.0.0.0:3000";
    let listener = TcpListener::bind(addr)
        .await
        .expect("Falha ao iniciar o listener TCP");
    tracing::info!("Servidor escutando em {}", listener.local_addr().unwrap());
    axum::serve(listener, app).await.expect("Erro no servidor Axum");
}
