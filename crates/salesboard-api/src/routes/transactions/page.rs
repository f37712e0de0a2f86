//! Transactions page rendering - Full page endpoints
//!
//! Endpoints:
//! - page_dashboard: Month selector, searchable table, statistics and price chart
//!
//! The page is static HTML; all data is loaded by the browser from the JSON API.

use axum::extract::Query;
use axum::response::Html;
use salesboard_core::SaleMonth;
use std::collections::HashMap;

/// Month shown when the page is opened without `?month=`
const DEFAULT_MONTH: u32 = 3;

const DASHBOARD_SCRIPT: &str = r#"
document.addEventListener('DOMContentLoaded', () => {
    const monthSelect = document.getElementById('monthSelect');
    const searchBox = document.getElementById('searchBox');
    const transactionsBody = document.getElementById('transactionsBody');
    const pageInfo = document.getElementById('pageInfo');
    const prevBtn = document.getElementById('prevBtn');
    const nextBtn = document.getElementById('nextBtn');
    const errorBox = document.getElementById('errorBox');
    const perPage = 10;

    let currentPage = 1;
    let chart = null;

    const showError = (message) => {
        errorBox.textContent = message || '';
        errorBox.classList.toggle('hidden', !message);
    };

    const cell = (value) => {
        const td = document.createElement('td');
        td.className = 'px-4 py-2';
        td.textContent = value;
        return td;
    };

    const loadTransactions = async () => {
        const params = new URLSearchParams({
            month: monthSelect.value,
            search: searchBox.value,
            page: currentPage,
            perPage: perPage,
        });
        const response = await fetch(`/api/transactions?${params}`);
        const data = await response.json();
        if (!response.ok) {
            showError(data.error);
            return;
        }

        transactionsBody.replaceChildren();
        data.transactions.forEach((t) => {
            const row = document.createElement('tr');
            row.className = 'border-b hover:bg-gray-50';
            [
                t.productId,
                t.title,
                t.description,
                t.price === null ? '-' : t.price.toFixed(2),
                t.category,
                t.sold ? 'Yes' : 'No',
                t.dateOfSale.slice(0, 10),
            ].forEach((value) => row.appendChild(cell(value)));
            transactionsBody.appendChild(row);
        });

        const pages = Math.max(1, Math.ceil(data.total / data.perPage));
        pageInfo.textContent = `Page ${data.page} of ${pages} (${data.total} transactions)`;
        prevBtn.disabled = data.page <= 1;
        nextBtn.disabled = data.page >= pages;
    };

    const loadSummary = async () => {
        const response = await fetch(`/api/transactions/combined?month=${encodeURIComponent(monthSelect.value)}`);
        const data = await response.json();
        if (!response.ok) {
            showError(data.error);
            return;
        }

        document.getElementById('totalAmount').textContent = data.statistics.totalSaleAmount.toFixed(2);
        document.getElementById('totalSoldItems').textContent = data.statistics.totalSoldItems;
        document.getElementById('totalNotSoldItems').textContent = data.statistics.totalNotSoldItems;

        const categoryList = document.getElementById('categoryList');
        categoryList.replaceChildren();
        data.pieChart.forEach((c) => {
            const item = document.createElement('li');
            item.className = 'flex justify-between py-1 border-b';
            const name = document.createElement('span');
            name.textContent = c.category || '(none)';
            const count = document.createElement('span');
            count.className = 'font-medium';
            count.textContent = c.count;
            item.append(name, count);
            categoryList.appendChild(item);
        });

        if (chart) {
            chart.destroy();
        }
        chart = new Chart(document.getElementById('priceChart').getContext('2d'), {
            type: 'bar',
            data: {
                labels: data.barChart.map((b) => b.range),
                datasets: [{
                    label: 'Number of items',
                    data: data.barChart.map((b) => b.count),
                    backgroundColor: 'rgba(79, 70, 229, 0.25)',
                    borderColor: 'rgba(79, 70, 229, 1)',
                    borderWidth: 1,
                }],
            },
            options: { scales: { y: { beginAtZero: true, ticks: { precision: 0 } } } },
        });
    };

    const reload = () => {
        showError('');
        loadTransactions();
        loadSummary();
    };

    monthSelect.addEventListener('change', () => {
        currentPage = 1;
        reload();
    });
    searchBox.addEventListener('input', () => {
        currentPage = 1;
        loadTransactions();
    });
    prevBtn.addEventListener('click', () => {
        if (currentPage > 1) {
            currentPage--;
            loadTransactions();
        }
    });
    nextBtn.addEventListener('click', () => {
        currentPage++;
        loadTransactions();
    });
    document.getElementById('reseedBtn').addEventListener('click', async () => {
        const response = await fetch('/api/transactions/init', { method: 'POST' });
        const data = await response.json();
        if (!response.ok) {
            showError(data.error);
            return;
        }
        currentPage = 1;
        reload();
    });

    reload();
});
"#;

/// Dashboard page - month selector, transactions table, statistics and bar chart
pub async fn page_dashboard(Query(params): Query<HashMap<String, String>>) -> Html<String> {
    let selected = params
        .get("month")
        .and_then(|m| m.parse::<SaleMonth>().ok())
        .map_or(DEFAULT_MONTH, SaleMonth::number);

    Html(crate::base_html("Transactions Dashboard", &render_dashboard(selected)))
}

/// `<option>` list for the month selector
pub fn render_month_options(selected: u32) -> String {
    SaleMonth::all()
        .map(|month| {
            format!(
                "<option value='{}'{}>{}</option>",
                month.number(),
                if month.number() == selected { " selected" } else { "" },
                month.name()
            )
        })
        .collect()
}

/// Page body; the script fills it in from the JSON API
pub fn render_dashboard(selected: u32) -> String {
    format!(
        r#"<div class='max-w-6xl mx-auto p-6'>
    <div class='flex items-center justify-between mb-6'>
        <h1 class='text-2xl font-bold'>Transactions Dashboard</h1>
        <button id='reseedBtn' class='px-4 py-2 bg-indigo-600 text-white rounded-lg hover:bg-indigo-700'>Reload seed data</button>
    </div>
    <div id='errorBox' class='hidden mb-4 p-3 rounded-lg bg-red-50 text-red-700 border border-red-200'></div>
    <div class='flex gap-4 mb-4'>
        <select id='monthSelect' class='px-3 py-2 border rounded-lg'>{}</select>
        <input id='searchBox' type='text' placeholder='Search title, description or price' class='flex-1 px-3 py-2 border rounded-lg'>
    </div>
    <div class='bg-white rounded-xl shadow-sm overflow-x-auto mb-4'>
        <table class='w-full text-sm'>
            <thead class='bg-gray-50'>
                <tr>
                    <th class='px-4 py-2 text-left'>ID</th>
                    <th class='px-4 py-2 text-left'>Title</th>
                    <th class='px-4 py-2 text-left'>Description</th>
                    <th class='px-4 py-2 text-left'>Price</th>
                    <th class='px-4 py-2 text-left'>Category</th>
                    <th class='px-4 py-2 text-left'>Sold</th>
                    <th class='px-4 py-2 text-left'>Date</th>
                </tr>
            </thead>
            <tbody id='transactionsBody'></tbody>
        </table>
    </div>
    <div class='flex items-center justify-between mb-8'>
        <button id='prevBtn' class='px-4 py-2 border rounded-lg hover:bg-gray-50 disabled:opacity-50'>Previous</button>
        <span id='pageInfo' class='text-gray-600'></span>
        <button id='nextBtn' class='px-4 py-2 border rounded-lg hover:bg-gray-50 disabled:opacity-50'>Next</button>
    </div>
    <div class='grid grid-cols-1 md:grid-cols-3 gap-4 mb-8'>
        <div class='bg-green-50 p-4 rounded-lg border border-green-200'><p class='text-sm text-green-600'>Total sale amount</p><p id='totalAmount' class='text-2xl font-bold text-green-700'>-</p></div>
        <div class='bg-blue-50 p-4 rounded-lg border border-blue-200'><p class='text-sm text-blue-600'>Sold items</p><p id='totalSoldItems' class='text-2xl font-bold text-blue-700'>-</p></div>
        <div class='bg-yellow-50 p-4 rounded-lg border border-yellow-200'><p class='text-sm text-yellow-600'>Not sold items</p><p id='totalNotSoldItems' class='text-2xl font-bold text-yellow-700'>-</p></div>
    </div>
    <div class='grid grid-cols-1 lg:grid-cols-3 gap-6'>
        <div class='lg:col-span-2 bg-white rounded-xl shadow-sm p-6'>
            <h3 class='text-lg font-semibold mb-4'>Items per price range</h3>
            <canvas id='priceChart'></canvas>
        </div>
        <div class='bg-white rounded-xl shadow-sm p-6'>
            <h3 class='text-lg font-semibold mb-4'>Items per category</h3>
            <ul id='categoryList'></ul>
        </div>
    </div>
</div>
<script>{}</script>"#,
        render_month_options(selected),
        DASHBOARD_SCRIPT
    )
}
